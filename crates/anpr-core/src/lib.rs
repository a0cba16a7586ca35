//! Core types shared across the ANPR console crates: configuration, the user
//! profile, the access-control tree, backend records and the client-side
//! error taxonomy.

pub mod access;
pub mod config;
pub mod problem;
pub mod records;
pub mod user;

pub use access::{
    AccessControl, AccessControlResponse, Component, ComponentCode, Permission, PermissionFlags,
    Tab, TabName,
};
pub use config::{
    AnprConfig, ApiConfig, ConfigError, FilterLimits, FilterScope, MAX_PAGE_SIZE, StorageConfig,
};
pub use problem::{ErrorCategory, ErrorNotice};
pub use records::{
    Acknowledgement, AssignedResource, AssignedResources, ListType, Notification,
    NotificationFeed, Page, VehicleLog, WatchlistEntry,
};
pub use user::{User, UserId};
