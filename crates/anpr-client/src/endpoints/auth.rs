//! Login and access-control endpoints.

use crate::api::{ApiClient, REQUEST_ID_HEADER};
use crate::error::{AuthError, ClientError};
use anpr_core::AccessControlResponse;
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

/// Body of a successful `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl ApiClient {
    /// Exchange a username and password for a token.
    ///
    /// Sent as form fields without an `Authorization` header. A 401 here
    /// means bad credentials and never expires the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let url = self.config().url("/auth/login");
        let response = self
            .http
            .post(&url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Login request failed");
                AuthError::Unreachable
            })?;

        let status = response.status();
        match status.as_u16() {
            _ if status.is_success() => response.json::<TokenResponse>().await.map_err(|e| {
                tracing::error!(error = %e, "Malformed login response");
                AuthError::Server { status: None }
            }),
            400 | 401 | 403 => {
                tracing::info!(username, status = status.as_u16(), "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
            _ => {
                tracing::warn!(status = status.as_u16(), "Login failed");
                Err(AuthError::Server {
                    status: Some(status.as_u16()),
                })
            }
        }
    }

    /// `GET /auth/me/access-control`: the user profile and tab tree.
    pub async fn fetch_access_control(&self) -> Result<AccessControlResponse, ClientError> {
        self.get("/auth/me/access-control").await
    }
}
