//! Watchlist endpoints.

use crate::api::ApiClient;
use crate::error::ClientError;
use anpr_core::{ListType, WatchlistEntry};
use anpr_policy::WatchlistForm;
use serde::{Deserialize, Serialize};

/// Body for adding or updating an entry. Built from a validated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistPayload {
    pub vehicle_number: String,
    pub list_type: ListType,
    pub reason: String,
}

impl From<WatchlistForm> for WatchlistPayload {
    fn from(form: WatchlistForm) -> Self {
        Self {
            vehicle_number: form.vehicle_number,
            list_type: form.list_type,
            reason: form.reason,
        }
    }
}

/// `GET /watchlist/` returns either a bare array or a wrapped listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<WatchlistEntry>),
    Wrapped {
        #[serde(alias = "data", alias = "entries", alias = "watchlist")]
        items: Vec<WatchlistEntry>,
    },
}

impl ApiClient {
    /// `GET /watchlist/`.
    pub async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, ClientError> {
        let listing: Listing = self.get("/watchlist/").await?;
        Ok(match listing {
            Listing::Bare(items) | Listing::Wrapped { items } => items,
        })
    }

    /// `POST /watchlist/`.
    pub async fn add_watchlist(
        &self,
        payload: &WatchlistPayload,
    ) -> Result<WatchlistEntry, ClientError> {
        self.post("/watchlist/", payload).await
    }

    /// `PUT /watchlist/{id}`.
    pub async fn update_watchlist(
        &self,
        id: i64,
        payload: &WatchlistPayload,
    ) -> Result<WatchlistEntry, ClientError> {
        self.put(&format!("/watchlist/{id}"), payload).await
    }
}
