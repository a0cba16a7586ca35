//! Client side of the ANPR console.
//!
//! - [`storage`]: the local key/value file holding the token and preferences.
//! - [`session`]: the session token and its lifecycle events.
//! - [`api`] and [`endpoints`]: the authenticated REST client.
//! - [`guard`]: per-view request cancellation.
//! - [`context`]: [`AppContext`], which ties these together and gates every
//!   operation on the cached access tree.

pub mod api;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod guard;
pub mod preferences;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use context::{AccessSnapshot, AppContext};
pub use endpoints::{
    FixVehicleNumber, LogFilter, LogQuery, NotificationQuery, ReportExport, ReportFormat, ReportRows,
    TokenResponse, WatchlistPayload,
};
pub use error::{AuthError, ClientError, INVALID_CREDENTIALS_MESSAGE, StorageError};
pub use guard::{RequestTicket, ViewRequests};
pub use preferences::Preferences;
pub use session::{Credentials, SessionEvent, SessionStore};
pub use storage::{FileStore, LocalStore, MemoryStore};
