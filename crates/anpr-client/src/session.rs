//! Session token storage and lifecycle events.
//!
//! The token is persisted to local storage so a restarted console stays
//! logged in, and is held in memory as a [`Secret`] so it never appears in
//! debug output or logs. Lifecycle changes are broadcast as
//! [`SessionEvent`]s; the application context listens for
//! [`SessionEvent::Expired`] to drop its access cache.

use crate::error::StorageError;
use crate::storage::{ACCESS_TOKEN_KEY, LocalStore, TOKEN_TYPE_KEY};
use secrecy::{ExposeSecret, Secret};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

const DEFAULT_TOKEN_TYPE: &str = "bearer";
const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored after a successful login.
    LoggedIn,
    /// The user logged out.
    LoggedOut,
    /// An authenticated request got 401; the token was cleared.
    Expired,
}

/// The token attached to outgoing requests.
#[derive(Debug)]
pub struct Credentials {
    token: Secret<String>,
    token_type: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        let token_type = token_type.into();
        Self {
            token: Secret::new(token.into()),
            token_type: if token_type.trim().is_empty() {
                DEFAULT_TOKEN_TYPE.to_string()
            } else {
                token_type
            },
        }
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// `Authorization` header value: `<token_type> <token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.token.expose_secret())
    }
}

/// Owns the session token.
pub struct SessionStore {
    store: Arc<dyn LocalStore>,
    current: RwLock<Option<Arc<Credentials>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create the store, restoring any token left in local storage.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let current = store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()).map(|token| {
            let token_type = store.get(TOKEN_TYPE_KEY).unwrap_or_default();
            Arc::new(Credentials::new(token, token_type))
        });
        if current.is_some() {
            tracing::debug!("Restored session token from local storage");
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            current: RwLock::new(current),
            events,
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The current token, if any.
    pub fn credentials(&self) -> Option<Arc<Credentials>> {
        self.current.read().ok()?.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }

    /// Persist a freshly issued token and announce the login.
    pub fn establish(&self, token: &str, token_type: &str) -> Result<(), StorageError> {
        let credentials = Credentials::new(token, token_type);
        self.store.set(ACCESS_TOKEN_KEY, token)?;
        self.store.set(TOKEN_TYPE_KEY, credentials.token_type())?;
        *self.current.write().map_err(|_| StorageError::Poisoned)? = Some(Arc::new(credentials));

        tracing::info!("Session established");
        self.notify(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Clear the token and announce the logout.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.clear()?;
        tracing::info!("Logged out");
        self.notify(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Handle a 401 from an authenticated request.
    ///
    /// Emits exactly one [`SessionEvent::Expired`] per call. A storage
    /// failure is logged; the in-memory token is dropped regardless.
    pub fn expire(&self) {
        if let Err(e) = self.clear() {
            tracing::error!(error = %e, "Failed to clear stored session token");
        }
        tracing::warn!("Session expired; token cleared");
        self.notify(SessionEvent::Expired);
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(TOKEN_TYPE_KEY)?;
        Ok(())
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
