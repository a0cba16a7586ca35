//! Records consumed from the ANPR backend.
//!
//! These mirror the JSON shapes of the dashboard, watchlist, notification and
//! report endpoints. Fields the console does not need to interpret are kept
//! optional so that backend additions do not break deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "data", alias = "logs")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages implied by `total` and `page_size`.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return if self.total == 0 { 0 } else { 1 };
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

fn default_page() -> u32 {
    1
}

/// Watchlist membership of a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Blacklisted,
    Whitelisted,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Blacklisted => "blacklisted",
            ListType::Whitelisted => "whitelisted",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blacklisted" | "blacklist" | "black" => Ok(ListType::Blacklisted),
            "whitelisted" | "whitelist" | "white" => Ok(ListType::Whitelisted),
            other => Err(format!(
                "unknown list type '{}', expected 'blacklisted' or 'whitelisted'",
                other
            )),
        }
    }
}

/// A single plate read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleLog {
    pub id: i64,
    pub vehicle_number: String,
    #[serde(default)]
    pub camera_id: Option<i64>,
    #[serde(default)]
    pub camera_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub captured_at: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub plate_image_url: Option<String>,
    #[serde(default)]
    pub watchlist_status: Option<ListType>,
}

/// A watchlisted plate with its audit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub vehicle_number: String,
    pub list_type: ListType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub added_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Notifications plus the unread counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default)]
    pub total: u64,
}

/// A camera assigned to the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedResource {
    #[serde(alias = "camera_id")]
    pub id: i64,
    #[serde(alias = "camera_name")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /configuration/assigned-resources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignedResources {
    #[serde(default, alias = "cameras")]
    pub resources: Vec<AssignedResource>,
}

/// Generic acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}
