//! Session Store - Persisted key-value cache
//!
//! Holds the last known-good identity snapshot and credential token.
//! Values round-trip through JSON; a malformed value on read degrades to
//! `None` instead of propagating a parse failure. The store is a cache,
//! not a system of record, so write failures are logged and swallowed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Store key for the serialized identity snapshot
pub const AUTH_USER_KEY: &str = "authUser";

/// Store key for the credential token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Persisted key-value store
///
/// The session manager is the sole writer of authentication keys; the
/// request pipeline only reads [`AUTH_TOKEN_KEY`]. Entries are
/// overwritten, never merged.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw serialized value for a key
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Set the raw serialized value for a key
    fn set_raw(&self, key: &str, value: String);

    /// Remove a key
    fn remove(&self, key: &str);

    /// Remove all keys
    fn clear(&self);

    /// Get and deserialize a value
    ///
    /// Returns `None` for missing keys and for values that no longer
    /// parse (e.g. written by an older client version).
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding malformed store value");
                None
            }
        }
    }

    /// Serialize and set a value
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize store value, skipping write");
            }
        }
    }
}

/// In-memory store
///
/// Used in tests and in hosts without a writable filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: String) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("store lock poisoned").remove(key);
    }

    fn clear(&self) {
        self.entries.lock().expect("store lock poisoned").clear();
    }
}

/// File-backed store
///
/// A single JSON object on disk, loaded leniently at open and rewritten
/// on every mutation. Corrupt or missing files start an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize store contents");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, raw) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist store, continuing anyway");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value);
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.remove(key);
        self.persist(&entries);
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.clear();
        self.persist(&entries);
    }
}
