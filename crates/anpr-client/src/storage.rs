//! Local key/value storage.
//!
//! The console keeps a handful of string values between runs: the session
//! token, the active tab, the dark-mode flag and custom tab orders. They live
//! in one JSON object at `<storage.directory>/storage.json`, loaded into
//! memory on open and rewritten on every change.

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Bearer token returned by the login endpoint.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Token type returned alongside the token.
pub const TOKEN_TYPE_KEY: &str = "token_type";
/// Name of the last selected tab.
pub const ACTIVE_TAB_KEY: &str = "activeTab";
/// `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";
/// JSON blob `{user_id: {tab_id: index}}`.
pub const CUSTOM_TAB_ORDERS_KEY: &str = "customTabOrders";

/// String key/value store shared by the session and preferences.
pub trait LocalStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Store backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store, creating the parent directory if needed.
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&content) {
                    Ok(values) => values,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt storage file");
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened local storage");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map to a temporary file and rename it over the old one.
    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Test that values survive reopening the file.
    #[test]
    fn test_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        store.set(DARK_MODE_KEY, "true").unwrap();
        store.remove(DARK_MODE_KEY).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(reopened.get(DARK_MODE_KEY), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    /// Test that a corrupt file opens as an empty store and is rewritten.
    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);

        store.set(ACTIVE_TAB_KEY, "Reports").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.get(ACTIVE_TAB_KEY).map(String::as_str), Some("Reports"));
    }

    /// Test that a failed write leaves memory matching the file.
    #[test]
    fn test_failed_write_keeps_previous_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let store = FileStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();

        // A directory in the way of the temp file makes every write fail.
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.remove(ACCESS_TOKEN_KEY).is_err());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));

        assert!(store.set(DARK_MODE_KEY, "true").is_err());
        assert_eq!(store.get(DARK_MODE_KEY), None);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(reopened.get(DARK_MODE_KEY), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
