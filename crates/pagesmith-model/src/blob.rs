//! Session-scoped image blobs.
//!
//! Picking a file in the editor does not upload it; the bytes are parked in
//! a [`BlobStore`] and referenced through a `blob:` handle until a save or
//! an export turns them into something portable.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::id::next_id;
use crate::image::{ImageRef, BLOB_PREFIX};

/// Image bytes together with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Arc<[u8]>,
    pub mime: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }
}

/// Errors that can occur when reading a blob.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Failed to read blob {handle}: {message}")]
    Read { handle: String, message: String },
}

/// Anything that can turn a `blob:` handle back into bytes.
#[async_trait]
pub trait BlobSource: Send + Sync {
    async fn fetch(&self, handle: &str) -> Result<Blob, BlobError>;
}

/// In-memory blob registry for one editing session.
///
/// Handles carry the store's session id, so a handle left over from an
/// earlier session never names a blob in this one.
#[derive(Debug, Clone)]
pub struct BlobStore {
    session: u64,
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
    counter: Arc<AtomicU64>,
}

impl Default for BlobStore {
    fn default() -> Self {
        Self {
            session: next_id(),
            blobs: Arc::default(),
            counter: Arc::default(),
        }
    }
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `blob` and return the handle that refers to it.
    pub async fn insert(&self, blob: Blob) -> ImageRef {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let handle = format!("{BLOB_PREFIX}pagesmith/{}/{n}", self.session);
        self.blobs.write().await.insert(handle.clone(), blob);
        ImageRef::LocalBlob(handle)
    }

    /// Read a file from disk into the store.
    pub async fn insert_file(&self, path: &Path) -> Result<ImageRef, BlobError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| BlobError::Read {
            handle: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(self.insert(Blob::new(bytes, guess_mime(path))).await)
    }

    /// Forget a handle. Later fetches of it fail.
    pub async fn revoke(&self, handle: &str) -> bool {
        self.blobs.write().await.remove(handle).is_some()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobSource for BlobStore {
    async fn fetch(&self, handle: &str) -> Result<Blob, BlobError> {
        self.blobs
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(handle.to_string()))
    }
}

/// Media type for an image file, from its extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
