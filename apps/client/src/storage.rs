//! Client-local key-value persistence, the session-storage analog.
//!
//! Holds the auth token, the serialized user record and the theme
//! preference. Values are opaque strings; callers own their encoding.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store contains invalid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value persistence for session state. Implementations must be safe to
/// share across tasks; components hold one behind an `Arc<dyn SessionStore>`.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// JSON-file-backed store. The whole map is loaded on open and rewritten on
/// every mutation; session state is a handful of short strings, so the
/// rewrite cost is irrelevant.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing contents. A missing file
    /// starts empty and is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            return self.persist(&entries);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("auth_token").unwrap(), None);
        store.set("auth_token", "abc123").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), Some("abc123".to_string()));
        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("auth_token", "abc123").unwrap();
            store.set("herald_theme", "dark").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("auth_token").unwrap(), Some("abc123".to_string()));
        assert_eq!(
            store.get("herald_theme").unwrap(),
            Some("dark".to_string())
        );
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("user_info", "{}").unwrap();
            store.remove("user_info").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("user_info").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }
}
