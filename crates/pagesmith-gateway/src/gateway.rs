//! Remote-first persistence with a local fallback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pagesmith_model::{ContentDocument, ImageRef};

use crate::api::{ContentApi, HttpContentApi, ImageUpload};
use crate::cache::{LocalCache, CONTENT_KEY};
use crate::error::GatewayResult;

/// Reads and writes the page document, preferring the backend and falling
/// back to the local cache whenever the backend is unavailable.
///
/// `load` and `save` never fail; callers cannot tell a network answer from
/// a cached one except through [`PersistenceGateway::is_loading`].
pub struct PersistenceGateway<A = HttpContentApi> {
    api: A,
    cache: Arc<LocalCache>,
    in_flight: AtomicUsize,
}

/// Marks a remote call as in flight for as long as it lives.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<A: ContentApi> PersistenceGateway<A> {
    pub fn new(api: A, cache: Arc<LocalCache>) -> Self {
        Self {
            api,
            cache,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn cache(&self) -> &Arc<LocalCache> {
        &self.cache
    }

    /// Whether a remote call is currently outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// The document last written to the cache, if any.
    pub async fn cached(&self) -> Option<ContentDocument> {
        self.cache.get_json(CONTENT_KEY).await
    }

    /// Fetch the document: backend, else cache, else the default document.
    pub async fn load(&self) -> ContentDocument {
        let remote = {
            let _guard = InFlight::start(&self.in_flight);
            self.api.fetch_content().await
        };

        match remote {
            Ok(doc) => {
                tracing::debug!("Loaded content from server ({} sections)", doc.sections.len());
                doc
            }
            Err(e) => {
                tracing::warn!("Failed to fetch from server, using local cache: {}", e);
                match self.cached().await {
                    Some(doc) => doc,
                    None => {
                        tracing::info!("No cached content, starting from the default page");
                        ContentDocument::default()
                    }
                }
            }
        }
    }

    /// Store `doc`. Returns the server's copy when the backend accepted it,
    /// otherwise `doc` itself. Either way the cache ends up holding `doc`.
    pub async fn save(&self, doc: &ContentDocument) -> ContentDocument {
        let remote = {
            let _guard = InFlight::start(&self.in_flight);
            self.api.put_content(doc).await
        };

        let result = match remote {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to save to server, using local cache: {}", e);
                doc.clone()
            }
        };

        if let Err(e) = self.cache.set_json(CONTENT_KEY, doc).await {
            tracing::warn!("Failed to mirror content into the local cache: {}", e);
        }

        result
    }

    /// Upload image bytes. Failures are returned; the caller keeps its
    /// local blob reference and may retry.
    pub async fn upload_image(&self, upload: ImageUpload) -> GatewayResult<ImageRef> {
        let _guard = InFlight::start(&self.in_flight);
        let file_name = upload.file_name.clone();
        let image = self.api.upload_image(upload).await.inspect_err(|e| {
            tracing::warn!("Image upload of {} failed: {}", file_name, e);
        })?;
        tracing::info!("Uploaded {} as {}", file_name, image);
        Ok(image)
    }
}
