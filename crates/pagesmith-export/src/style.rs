//! Inline style generation for sections.
//!
//! Style values come straight from the editor, so each one is checked
//! against the shape it should have before it reaches a `style` attribute.
//! Anything else is replaced by the default.

use std::sync::LazyLock;

use regex::Regex;

use pagesmith_model::StyleSet;

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|[a-zA-Z]{3,20}|(rgb|rgba|hsl|hsla)\([0-9.,%\s]+\))$",
    )
    .expect("colour pattern is valid")
});

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)?(px|em|rem|%|vh|vw|pt)?(\s+\d+(\.\d+)?(px|em|rem|%|vh|vw|pt)?){0,3}$")
        .expect("length pattern is valid")
});

/// Resolved, validated styles of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStyle {
    pub background_color: String,
    pub text_color: String,
    pub padding: String,
    pub text_align: &'static str,
}

impl SectionStyle {
    pub fn from_styles(styles: &StyleSet) -> Self {
        Self {
            background_color: checked(
                styles.background_color.as_deref(),
                &COLOR,
                StyleSet::DEFAULT_BACKGROUND_COLOR,
            ),
            text_color: checked(
                styles.text_color.as_deref(),
                &COLOR,
                StyleSet::DEFAULT_TEXT_COLOR,
            ),
            padding: checked(styles.padding.as_deref(), &LENGTH, StyleSet::DEFAULT_PADDING),
            text_align: styles.text_align_or_default().as_str(),
        }
    }

    /// The `style` attribute of the `<section>` element.
    pub fn section_css(&self) -> String {
        format!(
            "background-color: {}; color: {}; padding: {}; text-align: {};",
            self.background_color, self.text_color, self.padding, self.text_align
        )
    }

    /// The `style` attribute of the section heading.
    pub fn heading_css(&self, align: Option<&str>) -> String {
        format!(
            "color: {}; text-align: {};",
            self.text_color,
            align.unwrap_or(self.text_align)
        )
    }
}

fn checked(value: Option<&str>, pattern: &Regex, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if pattern.is_match(v) => v.to_string(),
        Some(v) => {
            tracing::debug!("Replacing invalid style value {:?} with {}", v, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}
