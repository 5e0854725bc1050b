//! Structural edits.
//!
//! Every edit returns a new document and copies only the path from the root
//! to the changed part. Sections and the banner that were not touched keep
//! their `Arc` identity, so a renderer can skip them with `Arc::ptr_eq`.

use std::sync::Arc;

use crate::document::{Banner, ContentDocument};
use crate::section::{ItemId, Section, SectionPatch};

impl ContentDocument {
    /// The document with its banner replaced.
    pub fn with_banner(&self, banner: Banner) -> Self {
        Self {
            banner: Arc::new(banner),
            sections: self.sections.clone(),
        }
    }

    /// The document with `section` appended.
    pub fn with_section_added(&self, section: Section) -> Self {
        let mut sections = self.sections.clone();
        sections.push(Arc::new(section));
        Self {
            banner: Arc::clone(&self.banner),
            sections,
        }
    }

    /// The document with the section `id` patched. Unknown ids leave the
    /// document unchanged.
    pub fn with_section_updated(&self, id: ItemId, patch: &SectionPatch) -> Self {
        let sections = self
            .sections
            .iter()
            .map(|section| {
                if section.id == id {
                    Arc::new(patch.apply(section))
                } else {
                    Arc::clone(section)
                }
            })
            .collect();
        Self {
            banner: Arc::clone(&self.banner),
            sections,
        }
    }

    /// The document without the section `id`.
    pub fn with_section_removed(&self, id: ItemId) -> Self {
        Self {
            banner: Arc::clone(&self.banner),
            sections: self
                .sections
                .iter()
                .filter(|s| s.id != id)
                .cloned()
                .collect(),
        }
    }

    /// The document with the section at `from` reinserted at `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range. Bounds come from the host
    /// list.
    pub fn with_section_moved(&self, from: usize, to: usize) -> Self {
        let mut sections = self.sections.clone();
        let moved = sections.remove(from);
        sections.insert(to, moved);
        Self {
            banner: Arc::clone(&self.banner),
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{SectionKind, StyleSet};
    use pretty_assertions::assert_eq;

    fn sample() -> ContentDocument {
        ContentDocument::new(
            Banner {
                title: "T".to_string(),
                ..Default::default()
            },
            vec![
                Section::new(1, SectionKind::Text, "A"),
                Section::new(2, SectionKind::About, "B"),
                Section::new(3, SectionKind::Gallery, "C"),
            ],
        )
    }

    fn ids(doc: &ContentDocument) -> Vec<ItemId> {
        doc.sections.iter().map(|s| s.id).collect()
    }

    #[test]
    fn style_edit_copies_only_the_touched_section() {
        let doc = sample();
        let styles = StyleSet {
            background_color: Some("#123456".to_string()),
            ..Default::default()
        };

        let next = doc.with_section_updated(2, &SectionPatch::styles(styles));

        assert!(Arc::ptr_eq(&doc.banner, &next.banner));
        assert!(Arc::ptr_eq(&doc.sections[0], &next.sections[0]));
        assert!(!Arc::ptr_eq(&doc.sections[1], &next.sections[1]));
        assert!(Arc::ptr_eq(&doc.sections[2], &next.sections[2]));
        assert_eq!(
            next.sections[1].styles.background_color.as_deref(),
            Some("#123456")
        );
        assert_eq!(doc.sections[1].styles.background_color, None);
    }

    #[test]
    fn banner_edit_shares_every_section() {
        let doc = sample();
        let next = doc.with_banner(Banner {
            title: "New".to_string(),
            ..Default::default()
        });

        assert_eq!(next.banner.title, "New");
        for (a, b) in doc.sections.iter().zip(&next.sections) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn move_preserves_relative_order() {
        let doc = sample();

        assert_eq!(ids(&doc.with_section_moved(0, 2)), vec![2, 3, 1]);
        assert_eq!(ids(&doc.with_section_moved(2, 0)), vec![3, 1, 2]);
        assert_eq!(ids(&doc.with_section_moved(1, 1)), vec![1, 2, 3]);

        let moved = doc.with_section_moved(0, 1);
        assert!(Arc::ptr_eq(&doc.sections[0], &moved.sections[1]));
    }

    #[test]
    fn add_and_remove() {
        let doc = sample();

        let added = doc.with_section_added(Section::new(4, SectionKind::Services, "D"));
        assert_eq!(ids(&added), vec![1, 2, 3, 4]);

        let removed = added.with_section_removed(2);
        assert_eq!(ids(&removed), vec![1, 3, 4]);

        assert_eq!(doc.with_section_removed(99), doc);
    }

    #[test]
    fn unknown_update_is_a_no_op() {
        let doc = sample();
        assert_eq!(doc.with_section_updated(42, &SectionPatch::title("x")), doc);
    }
}
