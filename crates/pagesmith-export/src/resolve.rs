//! Turning session-local image handles into embeddable data URIs.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future::join_all;

use pagesmith_model::{
    Banner, BlobSource, ContentDocument, GalleryImage, ImageRef, Section, SectionBody, ServiceItem,
};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Outcome of resolving every local blob a document references.
#[derive(Debug, Clone, Default)]
pub struct ResolvedImages {
    embedded: HashMap<String, ImageRef>,
    failed: Vec<String>,
}

impl ResolvedImages {
    /// Fetch every distinct `blob:` handle in `doc` concurrently.
    ///
    /// A handle that cannot be read is logged and recorded as failed; the
    /// others are unaffected.
    pub async fn collect(doc: &ContentDocument, source: &dyn BlobSource) -> Self {
        let handles: Vec<String> = doc
            .local_blob_refs()
            .into_iter()
            .map(|image| image.as_str().to_string())
            .collect();

        let tasks = handles.into_iter().map(|handle| async move {
            let result = embed(source, &handle).await;
            (handle, result)
        });

        let mut resolved = Self::default();
        for (handle, result) in join_all(tasks).await {
            match result {
                Ok(image) => {
                    resolved.embedded.insert(handle, image);
                }
                Err(e) => {
                    tracing::warn!("Dropping image {}: {}", handle, e);
                    resolved.failed.push(handle);
                }
            }
        }
        resolved
    }

    /// The portable form of `image`, or `None` when it was a local blob
    /// that could not be read.
    pub fn resolve(&self, image: &ImageRef) -> Option<ImageRef> {
        match image {
            ImageRef::LocalBlob(handle) => self.embedded.get(handle).cloned(),
            other => Some(other.clone()),
        }
    }

    fn resolve_opt(&self, image: &Option<ImageRef>) -> Option<ImageRef> {
        image.as_ref().and_then(|image| self.resolve(image))
    }

    /// Number of blobs that were embedded.
    pub fn embedded_count(&self) -> usize {
        self.embedded.len()
    }

    /// Handles that could not be read.
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// `doc` with every local blob replaced by its data URI. Unreadable
    /// images are removed: optional images are cleared and gallery entries
    /// dropped. Untouched sections keep sharing their allocation.
    pub fn apply(&self, doc: &ContentDocument) -> ContentDocument {
        let banner = if doc.banner.background_image.as_ref().is_some_and(ImageRef::is_local_blob) {
            Arc::new(Banner {
                background_image: self.resolve_opt(&doc.banner.background_image),
                ..(*doc.banner).clone()
            })
        } else {
            Arc::clone(&doc.banner)
        };

        let sections = doc
            .sections
            .iter()
            .map(|section| {
                if section.body.images().iter().any(|image| image.is_local_blob()) {
                    Arc::new(self.apply_section(section))
                } else {
                    Arc::clone(section)
                }
            })
            .collect();

        ContentDocument { banner, sections }
    }

    fn apply_section(&self, section: &Section) -> Section {
        let body = match &section.body {
            SectionBody::Text { content, image } => SectionBody::Text {
                content: content.clone(),
                image: self.resolve_opt(image),
            },
            SectionBody::About { content, image } => SectionBody::About {
                content: content.clone(),
                image: self.resolve_opt(image),
            },
            SectionBody::Services { items } => SectionBody::Services {
                items: items
                    .iter()
                    .map(|item| ServiceItem {
                        icon: self.resolve_opt(&item.icon),
                        ..item.clone()
                    })
                    .collect(),
            },
            SectionBody::Gallery { images } => SectionBody::Gallery {
                images: images
                    .iter()
                    .filter_map(|image| {
                        self.resolve(&image.url).map(|url| GalleryImage {
                            url,
                            ..image.clone()
                        })
                    })
                    .collect(),
            },
        };

        Section {
            body,
            ..section.clone()
        }
    }
}

/// Resolve every local blob in `doc` and return the portable document.
pub async fn embed_local_images(doc: &ContentDocument, source: &dyn BlobSource) -> ContentDocument {
    ResolvedImages::collect(doc, source).await.apply(doc)
}

async fn embed(source: &dyn BlobSource, handle: &str) -> Result<ImageRef, pagesmith_model::BlobError> {
    let blob = source.fetch(handle).await?;
    let mime = if blob.mime.is_empty() {
        FALLBACK_MIME
    } else {
        blob.mime.as_str()
    };
    Ok(ImageRef::embedded(mime, &STANDARD.encode(&blob.bytes)))
}
