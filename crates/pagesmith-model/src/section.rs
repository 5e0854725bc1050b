//! Content sections and their styling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::image::ImageRef;

/// Identifier of a section or of an item inside one.
pub type ItemId = u64;

/// One content block of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: ItemId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub styles: StyleSet,

    /// Kind-specific payload, flattened next to the common fields with a
    /// `type` discriminator.
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Kind-specific section payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionBody {
    Text {
        #[serde(default)]
        content: String,
        #[serde(default)]
        image: Option<ImageRef>,
    },
    About {
        #[serde(default)]
        content: String,
        #[serde(default)]
        image: Option<ImageRef>,
    },
    Services {
        #[serde(default)]
        items: Vec<ServiceItem>,
    },
    Gallery {
        #[serde(default)]
        images: Vec<GalleryImage>,
    },
}

/// A single offering in a services section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<ImageRef>,
}

/// A single picture in a gallery section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: ItemId,
    pub url: ImageRef,
    #[serde(default)]
    pub alt: String,
}

/// The section kinds the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Text,
    About,
    Services,
    Gallery,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [Self::Text, Self::About, Self::Services, Self::Gallery];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::About => "about",
            Self::Services => "services",
            Self::Gallery => "gallery",
        }
    }

    /// An empty payload of this kind.
    pub fn empty_body(self) -> SectionBody {
        match self {
            Self::Text => SectionBody::Text {
                content: String::new(),
                image: None,
            },
            Self::About => SectionBody::About {
                content: String::new(),
                image: None,
            },
            Self::Services => SectionBody::Services { items: Vec::new() },
            Self::Gallery => SectionBody::Gallery { images: Vec::new() },
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised section kind name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown section type: {0} (expected text, about, services or gallery)")]
pub struct UnknownSectionKind(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSectionKind(s.to_string()))
    }
}

impl SectionBody {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Text { .. } => SectionKind::Text,
            Self::About { .. } => SectionKind::About,
            Self::Services { .. } => SectionKind::Services,
            Self::Gallery { .. } => SectionKind::Gallery,
        }
    }

    /// Every image reference reachable from this payload, in document order.
    pub fn images(&self) -> Vec<&ImageRef> {
        match self {
            Self::Text { image, .. } | Self::About { image, .. } => image.iter().collect(),
            Self::Services { items } => items.iter().filter_map(|i| i.icon.as_ref()).collect(),
            Self::Gallery { images } => images.iter().map(|i| &i.url).collect(),
        }
    }
}

impl Section {
    /// A new, empty section of the given kind with default styles.
    pub fn new(id: ItemId, kind: SectionKind, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            styles: StyleSet::default(),
            body: kind.empty_body(),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.body.kind()
    }
}

/// Horizontal text alignment of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Presentation settings of a section. Absent fields take their defaults
/// when the section is rendered; they are never filled in on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl StyleSet {
    pub const DEFAULT_BACKGROUND_COLOR: &'static str = "#ffffff";
    pub const DEFAULT_TEXT_COLOR: &'static str = "#000000";
    pub const DEFAULT_PADDING: &'static str = "20px";
    pub const DEFAULT_TEXT_ALIGN: TextAlign = TextAlign::Left;

    pub fn background_color_or_default(&self) -> &str {
        self.background_color
            .as_deref()
            .unwrap_or(Self::DEFAULT_BACKGROUND_COLOR)
    }

    pub fn text_color_or_default(&self) -> &str {
        self.text_color.as_deref().unwrap_or(Self::DEFAULT_TEXT_COLOR)
    }

    pub fn padding_or_default(&self) -> &str {
        self.padding.as_deref().unwrap_or(Self::DEFAULT_PADDING)
    }

    pub fn text_align_or_default(&self) -> TextAlign {
        self.text_align.unwrap_or(Self::DEFAULT_TEXT_ALIGN)
    }
}

/// A partial update to a section. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub styles: Option<StyleSet>,
    pub body: Option<SectionBody>,
}

impl SectionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn styles(styles: StyleSet) -> Self {
        Self {
            styles: Some(styles),
            ..Default::default()
        }
    }

    pub fn body(body: SectionBody) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.styles.is_none() && self.body.is_none()
    }

    /// The section with this patch applied.
    pub fn apply(&self, section: &Section) -> Section {
        Section {
            id: section.id,
            title: self.title.clone().unwrap_or_else(|| section.title.clone()),
            styles: self.styles.clone().unwrap_or_else(|| section.styles.clone()),
            body: self.body.clone().unwrap_or_else(|| section.body.clone()),
        }
    }
}
