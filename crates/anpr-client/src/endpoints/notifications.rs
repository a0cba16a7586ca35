//! Notification feed.

use crate::api::ApiClient;
use crate::error::ClientError;
use anpr_core::NotificationFeed;
use serde::Serialize;

/// Body for `POST /notifications/my-notifications`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationQuery {
    pub page: u32,
    pub page_size: u32,
    pub unread_only: bool,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            unread_only: false,
        }
    }
}

impl ApiClient {
    pub async fn notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<NotificationFeed, ClientError> {
        self.post("/notifications/my-notifications", query).await
    }
}
