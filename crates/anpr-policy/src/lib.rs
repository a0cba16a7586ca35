//! Policy for the ANPR console.
//!
//! - [`evaluator`]: answers "can this user do X in tab T, component C?" over
//!   the cached access-control tree.
//! - [`ordering`]: merges server tab order with the user's custom order and
//!   picks the active tab.
//! - [`validation`]: the single place form input is checked before a
//!   request is sent.

pub mod error;
pub mod evaluator;
pub mod ordering;
pub mod validation;

pub use error::{AccessDenied, ValidationError, ValidationErrorKind};
pub use evaluator::{AccessPolicy, Decision};
pub use ordering::{TabOrder, default_tab, move_tab, order_tabs, prune, resolve_active_tab};
pub use validation::{DateRange, PageRequest, WatchlistForm};
