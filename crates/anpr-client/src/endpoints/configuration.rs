//! Configuration endpoints.

use crate::api::ApiClient;
use crate::error::ClientError;
use anpr_core::AssignedResources;

impl ApiClient {
    /// Cameras and sites assigned to the current user.
    pub async fn assigned_resources(&self) -> Result<AssignedResources, ClientError> {
        self.post("/configuration/assigned-resources", &serde_json::json!({}))
            .await
    }
}
