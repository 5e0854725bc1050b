//! Content model for pagesmith pages.
//!
//! A page is a [`ContentDocument`]: a banner and an ordered list of typed
//! sections. Documents are values; edits produce new documents that share
//! whatever they did not change.

pub mod blob;
pub mod document;
pub mod edit;
pub mod id;
pub mod image;
pub mod section;

pub use blob::{guess_mime, Blob, BlobError, BlobSource, BlobStore};
pub use document::{Banner, ContentDocument};
pub use id::next_id;
pub use image::ImageRef;
pub use section::{
    GalleryImage, ItemId, Section, SectionBody, SectionKind, SectionPatch, ServiceItem, StyleSet,
    TextAlign, UnknownSectionKind,
};
