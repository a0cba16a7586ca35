//! Per-view request guards.
//!
//! Each view (the dashboard log table, the report table, ...) has at most one
//! live request. Starting a new one cancels the previous one, and a result is
//! applied only if its ticket is still current when the request completes.
//! Superseded results are discarded as [`ClientError::Superseded`].

use crate::error::ClientError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Identifies one request for one view.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    view: String,
    generation: u64,
    cancel: CancellationToken,
}

impl RequestTicket {
    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct Slot {
    generation: u64,
    cancel: CancellationToken,
}

/// Registry of the current request per view.
#[derive(Default)]
pub struct ViewRequests {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ViewRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `view`, cancelling the one in flight.
    pub fn begin(&self, view: &str) -> RequestTicket {
        let cancel = CancellationToken::new();
        let mut slots = match self.slots.lock() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };

        let generation = match slots.get_mut(view) {
            Some(slot) => {
                slot.cancel.cancel();
                slot.generation += 1;
                slot.cancel = cancel.clone();
                slot.generation
            }
            None => {
                slots.insert(
                    view.to_string(),
                    Slot {
                        generation: 1,
                        cancel: cancel.clone(),
                    },
                );
                1
            }
        };

        tracing::trace!(view, generation, "Request started");
        RequestTicket {
            view: view.to_string(),
            generation,
            cancel,
        }
    }

    /// Whether `ticket` is still the latest request for its view.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        if ticket.is_cancelled() {
            return false;
        }
        let slots = match self.slots.lock() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };
        slots
            .get(&ticket.view)
            .is_some_and(|slot| slot.generation == ticket.generation)
    }

    /// Cancel the request in flight for `view`, if any.
    pub fn cancel(&self, view: &str) {
        if let Ok(slots) = self.slots.lock()
            && let Some(slot) = slots.get(view)
        {
            slot.cancel.cancel();
        }
    }

    /// Cancel every in-flight request.
    pub fn cancel_all(&self) {
        if let Ok(slots) = self.slots.lock() {
            for slot in slots.values() {
                slot.cancel.cancel();
            }
        }
    }

    /// Run `request` as the current request for `view`.
    ///
    /// Returns [`ClientError::Superseded`] if a newer request for the same
    /// view started, or the view was cancelled, before this one finished.
    pub async fn run<T, F>(&self, view: &str, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let ticket = self.begin(view);
        let result = tokio::select! {
            biased;
            _ = ticket.cancel.cancelled() => None,
            result = request => Some(result),
        };

        match result {
            Some(result) if self.is_current(&ticket) => result,
            _ => {
                tracing::debug!(view, generation = ticket.generation, "Discarding superseded response");
                Err(ClientError::Superseded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Test that a second ticket supersedes the first.
    #[test]
    fn test_newer_ticket_wins() {
        let views = ViewRequests::new();
        let first = views.begin("logs");
        let second = views.begin("logs");

        assert!(first.is_cancelled());
        assert!(!views.is_current(&first));
        assert!(views.is_current(&second));
        assert_eq!(second.generation(), first.generation() + 1);
    }

    /// Test that different views do not interfere.
    #[test]
    fn test_views_are_independent() {
        let views = ViewRequests::new();
        let logs = views.begin("logs");
        let report = views.begin("report");

        assert!(views.is_current(&logs));
        assert!(views.is_current(&report));

        views.cancel("report");
        assert!(views.is_current(&logs));
        assert!(!views.is_current(&report));
    }

    /// Test that a slow request is discarded when a newer one starts.
    #[tokio::test]
    async fn test_run_discards_superseded() {
        let views = Arc::new(ViewRequests::new());
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let slow = {
            let views = views.clone();
            tokio::spawn(async move {
                views
                    .run("logs", async move {
                        let _ = release_rx.await;
                        Ok::<_, ClientError>("stale")
                    })
                    .await
            })
        };

        // Let the slow request register before superseding it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fresh = views.run("logs", async { Ok::<_, ClientError>("fresh") }).await;
        let _ = release_tx.send(());

        assert_eq!(fresh.unwrap(), "fresh");
        assert!(matches!(slow.await.unwrap(), Err(ClientError::Superseded)));
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let views = ViewRequests::new();
        let ticket = views.begin("notifications");
        views.cancel_all();
        assert!(!views.is_current(&ticket));
        let result = views.run("notifications", async { Ok::<_, ClientError>(1) }).await;
        assert_eq!(result.unwrap(), 1);
    }
}
