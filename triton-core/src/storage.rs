//! Key-value persistence surface.
//!
//! The token engine persists two things: the discovery cache and the user preset
//! list. Both are opaque JSON strings stored under a fixed key, so the backend
//! interface is a plain string map. [`FileKeyValueStore`] keeps one file per key;
//! [`MemoryKeyValueStore`] is used by tests and embedders, and can enforce a byte
//! quota to reproduce "storage full" failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CoreError;
use crate::utils::fs::ensure_dir_exists_async;

/// Asynchronous string-keyed storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}

fn validate_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!("Invalid storage key: '{}'", key)))
    }
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Filesystem {
                message: format!("Failed to read key '{}'", key),
                path,
                source: e,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        ensure_dir_exists_async(&self.root).await?;
        tokio::fs::write(&path, value).await.map_err(|e| CoreError::Filesystem {
            message: format!("Failed to write key '{}'", key),
            path,
            source: e,
        })
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Filesystem {
                message: format!("Failed to remove key '{}'", key),
                path,
                source: e,
            }),
        }
    }
}

/// In-memory store with an optional total byte quota.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes once the sum of all value lengths would exceed `limit`.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(limit),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|e| CoreError::Internal(format!("Memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.lock()?;
        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let requested = others + value.len();
            if requested > limit {
                return Err(CoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_store_round_trips_values() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("kv"));

        assert_eq!(store.get("triton-user-presets").await.unwrap(), None);
        store.set("triton-user-presets", "[]").await.unwrap();
        assert_eq!(store.get("triton-user-presets").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("kv").join("triton-user-presets.json").is_file());

        store.remove("triton-user-presets").await.unwrap();
        store.remove("triton-user-presets").await.unwrap();
        assert_eq!(store.get("triton-user-presets").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        let err = store.set("../escape", "x").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn memory_store_enforces_quota() {
        let store = MemoryKeyValueStore::with_quota(8);
        store.set("a", "1234").await.unwrap();
        // Replacing a key only counts the new value.
        store.set("a", "12345678").await.unwrap();

        match store.set("b", "x").await {
            Err(CoreError::QuotaExceeded { key, requested, limit }) => {
                assert_eq!(key, "b");
                assert_eq!(requested, 9);
                assert_eq!(limit, 8);
            }
            other => panic!("Expected QuotaExceeded, got {:?}", other),
        }
        assert_eq!(store.get("b").await.unwrap(), None);
    }
}
