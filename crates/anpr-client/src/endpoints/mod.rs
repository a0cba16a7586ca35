//! Typed wrappers for the backend endpoints.
//!
//! Each submodule adds methods to [`ApiClient`](crate::ApiClient) for one
//! area of the backend, plus the request bodies it sends.

pub mod auth;
pub mod configuration;
pub mod dashboard;
pub mod notifications;
pub mod reports;
pub mod watchlist;

pub use auth::TokenResponse;
pub use dashboard::{FixVehicleNumber, LogFilter, LogQuery};
pub use notifications::NotificationQuery;
pub use reports::{ReportExport, ReportFormat, ReportRows};
pub use watchlist::WatchlistPayload;
