//! Persistent key-value storage and the bearer-token slot built on it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser clients keep the token in local storage; here the capability is a
//! [`KeyValueStore`] trait so the session can run against an in-memory map in
//! tests and a JSON file on disk in the CLI.
//!
//! ERROR HANDLING
//! ==============
//! Stores never fail toward callers. [`FileStore`] keeps its in-memory map
//! authoritative and logs disk write failures, so a read-only config dir
//! degrades to a process-lifetime session instead of breaking login.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Fixed key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Minimal key-value capability: `get`, `set`, `remove`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

fn lock(entries: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-lifetime store. Used by tests and as a fallback when no storage
/// path is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON-object file on disk, rewritten in full on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and also starts empty; the next write replaces it.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(error) = write_entries(&self.path, entries) {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist storage file");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to read storage file");
            return HashMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "ignoring corrupt storage file");
            HashMap::new()
        }
    }
}

fn write_entries(path: &Path, entries: &HashMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
    std::fs::write(path, rendered)
}

// =============================================================================
// TOKEN STORE
// =============================================================================

/// Holds at most one bearer token. Setting replaces, clearing removes.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("present", &self.is_present()).finish()
    }
}

impl TokenStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Current token; an empty stored string counts as absent.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn set(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
