//! Durable keyed string store.
//!
//! One JSON object file holding every key, read once at open and rewritten
//! on every change. A missing or unreadable file reads as an empty store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::CacheError;

/// Key holding the serialized page document.
pub const CONTENT_KEY: &str = "websiteContent";

/// Key holding the `"true"`/`"false"` authentication flag.
pub const AUTH_KEY: &str = "isAuthenticated";

/// Key holding the bearer token of the signed-in user.
pub const TOKEN_KEY: &str = "authToken";

/// Key holding the last active page name.
pub const PAGE_KEY: &str = "currentPage";

/// Process-wide keyed store.
#[derive(Debug)]
pub struct LocalCache {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalCache {
    /// Open the cache file at `path`, creating nothing until the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        tracing::debug!("Opened cache {} with {} keys", path.display(), entries.len());

        Self {
            path: Some(path),
            entries: RwLock::new(entries),
        }
    }

    /// A cache that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.into());
        self.flush(&entries).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }

    /// Decode a JSON value stored under `key`. Undecodable values read as
    /// absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(|e| CacheError::Encode(e.to_string()))?;
        self.set(key, raw).await
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let write_err = |e: std::io::Error| CacheError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let text =
            serde_json::to_string_pretty(entries).map_err(|e| CacheError::Encode(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Write beside the target and rename so readers never see half a file.
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, text).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn persists_across_reopen() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.json");

        let cache = LocalCache::open(&path).await;
        cache.set(PAGE_KEY, "dashboard").await.unwrap();
        cache.set(AUTH_KEY, "true").await.unwrap();
        drop(cache);

        let reopened = LocalCache::open(&path).await;
        assert_eq!(reopened.get(PAGE_KEY).await.as_deref(), Some("dashboard"));
        assert_eq!(reopened.get(AUTH_KEY).await.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let cache = LocalCache::open(temp.path().join("absent.json")).await;

        assert_eq!(cache.get(CONTENT_KEY).await, None);
    }

    #[tokio::test]
    async fn corrupt_file_is_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = LocalCache::open(&path).await;
        assert_eq!(cache.get(CONTENT_KEY).await, None);

        cache.set(CONTENT_KEY, "{}").await.unwrap();
        assert_eq!(LocalCache::open(&path).await.get(CONTENT_KEY).await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn removes_keys() {
        let cache = LocalCache::in_memory();
        cache.set(TOKEN_KEY, "abc").await.unwrap();
        cache.remove(TOKEN_KEY).await.unwrap();

        assert_eq!(cache.get(TOKEN_KEY).await, None);
        assert!(cache.path().is_none());
    }

    #[tokio::test]
    async fn undecodable_json_reads_as_absent() {
        let cache = LocalCache::in_memory();
        cache.set(CONTENT_KEY, "[1, 2").await.unwrap();

        let value: Option<Vec<u32>> = cache.get_json(CONTENT_KEY).await;
        assert_eq!(value, None);

        cache.set_json(CONTENT_KEY, &vec![1u32, 2]).await.unwrap();
        let value: Option<Vec<u32>> = cache.get_json(CONTENT_KEY).await;
        assert_eq!(value, Some(vec![1, 2]));
    }
}
