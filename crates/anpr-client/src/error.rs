//! Error types for the client crate.

use anpr_core::{ErrorCategory, ErrorNotice};
use anpr_policy::{AccessDenied, ValidationError};
use thiserror::Error;

/// Exact message shown when the backend rejects the credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password. Please try again.";

/// Errors from reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the storage file.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage file is not valid JSON.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A lock guarding the storage was poisoned.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Why a login attempt failed.
///
/// The display text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend could not be reached.
    #[error("Unable to reach the server. Please check your connection and try again.")]
    Unreachable,

    /// The backend rejected the username or password.
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,

    /// The backend failed.
    #[error("The server encountered an error. Please try again later.")]
    Server { status: Option<u16> },
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::Unreachable => ErrorCategory::NetworkUnreachable,
            AuthError::InvalidCredentials => ErrorCategory::Unauthorized,
            AuthError::Server { .. } => ErrorCategory::ServerError,
        }
    }
}

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No session token is stored.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend answered 401; the session has been cleared.
    #[error("session expired")]
    SessionExpired,

    /// Login failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The access-control tree does not allow the operation.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// The backend could not be reached.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        category: ErrorCategory,
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// A newer request for the same view replaced this one.
    #[error("request superseded by a newer one")]
    Superseded,

    /// Local storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Writing an export failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl ClientError {
    /// Classify a transport error from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_connect() {
            ClientError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }

    /// The taxonomy entry for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::NotAuthenticated | ClientError::SessionExpired => {
                ErrorCategory::Unauthorized
            }
            ClientError::Auth(err) => err.category(),
            ClientError::Validation(_) => ErrorCategory::ValidationError,
            ClientError::Forbidden(_) => ErrorCategory::Forbidden,
            ClientError::Unreachable(_) => ErrorCategory::NetworkUnreachable,
            ClientError::Timeout(_) => ErrorCategory::Timeout,
            ClientError::Api { category, .. } => *category,
            ClientError::Decode(_)
            | ClientError::Transport(_)
            | ClientError::Superseded
            | ClientError::Storage(_)
            | ClientError::Export(_) => ErrorCategory::Unknown,
        }
    }

    /// What to show the user.
    pub fn notice(&self) -> ErrorNotice {
        let category = self.category();
        match self {
            ClientError::NotAuthenticated => {
                category.notice(Some("You are not logged in. Please log in to continue."))
            }
            ClientError::Auth(err) => category.notice(Some(&err.to_string())),
            ClientError::Validation(err) => category.notice(Some(&err.message)),
            ClientError::Api { message, .. } => category.notice(message.as_deref()),
            _ => category.notice(None),
        }
    }

    /// Whether the caller should offer a retry action.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"message": "..."}` and
/// `{"detail": [{"msg": "..."}]}`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let text = match value.get("detail").or_else(|| value.get("message"))? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_message_is_exact() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), INVALID_CREDENTIALS_MESSAGE);
        let err = ClientError::from(AuthError::InvalidCredentials);
        assert_eq!(err.notice().message, INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn server_message_shapes() {
        assert_eq!(
            server_message(r#"{"detail": "Plate already on watchlist"}"#).as_deref(),
            Some("Plate already on watchlist")
        );
        assert_eq!(
            server_message(r#"{"message": "Camera offline"}"#).as_deref(),
            Some("Camera offline")
        );
        assert_eq!(
            server_message(r#"{"detail": [{"msg": "field required"}, {"msg": "bad date"}]}"#)
                .as_deref(),
            Some("field required; bad date")
        );
        assert_eq!(server_message("<html>502</html>"), None);
        assert_eq!(server_message(r#"{"detail": "  "}"#), None);
    }

    #[test]
    fn api_errors_use_server_message() {
        let err = ClientError::Api {
            status: 404,
            category: ErrorCategory::NotFound,
            message: Some("Log 42 not found".to_string()),
        };
        let notice = err.notice();
        assert_eq!(notice.title, "Not Found");
        assert_eq!(notice.message, "Log 42 not found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn validation_errors_show_their_message() {
        let err = ClientError::from(ValidationError::start_after_end());
        assert_eq!(err.category(), ErrorCategory::ValidationError);
        assert_eq!(err.notice().message, "Start date cannot be after end date.");
    }
}
