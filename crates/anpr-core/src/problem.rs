//! Client-side error taxonomy.
//!
//! Every failure surfaced to the user is classified into one category, and
//! each category has a fixed title, message and icon. A message supplied by
//! the server replaces the generic message but never the title or icon.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-classified error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    NetworkUnreachable,
    ServerError,
    Timeout,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    Unknown,
}

impl ErrorCategory {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            400 | 422 => ErrorCategory::ValidationError,
            408 | 504 => ErrorCategory::Timeout,
            500..=599 => ErrorCategory::ServerError,
            _ => ErrorCategory::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ErrorCategory::NetworkUnreachable => "Connection Error",
            ErrorCategory::ServerError => "Server Error",
            ErrorCategory::Timeout => "Request Timeout",
            ErrorCategory::Unauthorized => "Session Expired",
            ErrorCategory::Forbidden => "Access Denied",
            ErrorCategory::NotFound => "Not Found",
            ErrorCategory::ValidationError => "Invalid Request",
            ErrorCategory::Unknown => "Something Went Wrong",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCategory::NetworkUnreachable => {
                "Unable to reach the server. Please check your connection and try again."
            }
            ErrorCategory::ServerError => {
                "The server encountered an error. Please try again later."
            }
            ErrorCategory::Timeout => "The request took too long to complete. Please try again.",
            ErrorCategory::Unauthorized => "Your session has expired. Please log in again.",
            ErrorCategory::Forbidden => "You do not have permission to perform this action.",
            ErrorCategory::NotFound => "The requested resource could not be found.",
            ErrorCategory::ValidationError => "Please check your input and try again.",
            ErrorCategory::Unknown => "An unexpected error occurred. Please try again.",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ErrorCategory::NetworkUnreachable => "wifi-off",
            ErrorCategory::ServerError => "server",
            ErrorCategory::Timeout => "clock",
            ErrorCategory::Unauthorized => "lock",
            ErrorCategory::Forbidden => "shield-off",
            ErrorCategory::NotFound => "search",
            ErrorCategory::ValidationError => "alert-triangle",
            ErrorCategory::Unknown => "help-circle",
        }
    }

    /// Whether offering a retry action makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::NetworkUnreachable
                | ErrorCategory::ServerError
                | ErrorCategory::Timeout
                | ErrorCategory::Unknown
        )
    }

    /// Build the display notice, letting a non-blank server message win.
    pub fn notice(&self, server_message: Option<&str>) -> ErrorNotice {
        let message = server_message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.message());
        ErrorNotice {
            category: *self,
            title: self.title().to_string(),
            message: message.to_string(),
            icon: self.icon().to_string(),
        }
    }
}

/// What the user is shown for an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub category: ErrorCategory,
    pub title: String,
    pub message: String,
    pub icon: String,
}

impl fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.icon, self.title, self.message)
    }
}
