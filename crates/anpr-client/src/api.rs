//! Authenticated HTTP plumbing.
//!
//! Every authenticated request carries `Authorization: <token_type> <token>`
//! and a fresh `x-request-id`. A 401 expires the session through the
//! [`SessionStore`]; other non-success statuses become
//! [`ClientError::Api`] classified by status code.

use crate::error::{ClientError, server_message};
use crate::session::SessionStore;
use anpr_core::{ApiConfig, ErrorCategory};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the ANPR backend.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) http: Client,
    config: ApiConfig,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<SessionStore>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::from_transport)?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticated GET.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.http.get(self.config.url(path));
        self.send(path, request).await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.config.url(path)).json(body);
        self.send(path, request).await
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.config.url(path)).json(body);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let credentials = self
            .session
            .credentials()
            .ok_or(ClientError::NotAuthenticated)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%request_id, path, "Sending request");

        let response = request
            .header(AUTHORIZATION, credentials.authorization())
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%request_id, path, error = %e, "Request failed");
                ClientError::from_transport(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%request_id, path, "Received 401, expiring session");
            self.session.expire();
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body);
            tracing::warn!(
                %request_id,
                path,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "Request rejected"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                category: ErrorCategory::from_status(status.as_u16()),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(%request_id, path, error = %e, "Unexpected response body");
            ClientError::Decode(e.to_string())
        })
    }
}
