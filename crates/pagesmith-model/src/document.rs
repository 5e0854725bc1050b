//! The page document: a banner followed by ordered sections.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::image::ImageRef;
use crate::section::{ItemId, Section};

/// The full page model.
///
/// Banner and sections sit behind `Arc` so that edits can share every part
/// of the document they did not touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub banner: Arc<Banner>,

    #[serde(default)]
    pub sections: Vec<Arc<Section>>,
}

/// The hero block at the top of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub background_image: Option<ImageRef>,

    #[serde(default)]
    pub cta_text: String,

    #[serde(default)]
    pub cta_link: String,
}

impl Default for ContentDocument {
    /// The document served when neither the backend nor the cache has one.
    fn default() -> Self {
        Self {
            banner: Arc::new(Banner {
                title: "Welcome to Our Website".to_string(),
                subtitle: "Discover amazing content".to_string(),
                background_image: None,
                cta_text: "Learn More".to_string(),
                cta_link: "#".to_string(),
            }),
            sections: Vec::new(),
        }
    }
}

impl ContentDocument {
    pub fn new(banner: Banner, sections: Vec<Section>) -> Self {
        Self {
            banner: Arc::new(banner),
            sections: sections.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn section(&self, id: ItemId) -> Option<&Section> {
        self.sections.iter().map(Arc::as_ref).find(|s| s.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Every image reference in the document, banner first, then sections
    /// in order.
    pub fn images(&self) -> Vec<&ImageRef> {
        let mut images: Vec<&ImageRef> = self.banner.background_image.iter().collect();
        for section in &self.sections {
            images.extend(section.body.images());
        }
        images
    }

    /// The distinct `blob:` handles referenced anywhere in the document.
    pub fn local_blob_refs(&self) -> Vec<&ImageRef> {
        let mut refs: Vec<&ImageRef> = Vec::new();
        for image in self.images() {
            if image.is_local_blob() && !refs.contains(&image) {
                refs.push(image);
            }
        }
        refs
    }
}
