//! Image references in their three representations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of an embedded data URI.
pub const DATA_PREFIX: &str = "data:";

/// Prefix of an ephemeral local blob handle.
pub const BLOB_PREFIX: &str = "blob:";

/// A reference to image bytes.
///
/// On the wire an `ImageRef` is the plain string the editor stored; the
/// variant is recovered from its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageRef {
    /// An absolute or relative URL served by some remote host.
    Remote(String),

    /// A `data:` URI carrying the bytes inline.
    Embedded(String),

    /// A `blob:` handle that is only valid inside the current session.
    LocalBlob(String),
}

impl ImageRef {
    /// Classify a raw reference string.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(DATA_PREFIX) {
            Self::Embedded(raw)
        } else if raw.starts_with(BLOB_PREFIX) {
            Self::LocalBlob(raw)
        } else {
            Self::Remote(raw)
        }
    }

    /// Build an embedded reference from raw bytes already encoded as base64.
    pub fn embedded(mime: &str, base64_payload: &str) -> Self {
        Self::Embedded(format!("{DATA_PREFIX}{mime};base64,{base64_payload}"))
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(s) | Self::Embedded(s) | Self::LocalBlob(s) => s,
        }
    }

    pub fn is_local_blob(&self) -> bool {
        matches!(self, Self::LocalBlob(_))
    }

    /// Whether the reference survives a session boundary.
    pub fn is_portable(&self) -> bool {
        !self.is_local_blob()
    }
}

impl From<String> for ImageRef {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for ImageRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        match image {
            ImageRef::Remote(s) | ImageRef::Embedded(s) | ImageRef::LocalBlob(s) => s,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_prefix() {
        assert!(matches!(
            ImageRef::parse("https://cdn.example.com/a.png"),
            ImageRef::Remote(_)
        ));
        assert!(matches!(
            ImageRef::parse("data:image/png;base64,AAAA"),
            ImageRef::Embedded(_)
        ));
        assert!(matches!(ImageRef::parse("blob:session/7"), ImageRef::LocalBlob(_)));
        assert!(matches!(ImageRef::parse("/uploads/a.png"), ImageRef::Remote(_)));
    }

    #[test]
    fn serializes_as_plain_string() {
        let image = ImageRef::parse("blob:session/3");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"blob:session/3\"");

        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
        assert!(!back.is_portable());
    }

    #[test]
    fn builds_embedded_uri() {
        let image = ImageRef::embedded("image/png", "iVBO");
        assert_eq!(image.as_str(), "data:image/png;base64,iVBO");
        assert!(image.is_portable());
    }
}
