//! Undo/redo over whole-document snapshots.

use std::sync::Arc;

use pagesmith_model::ContentDocument;

/// An ordered list of document snapshots with a cursor on the present one.
///
/// Entries before the cursor are the past, entries after it the future.
/// Accepting a new state drops the future. Snapshots share structure with
/// each other, so keeping every one of them stays cheap for a single page.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<Arc<ContentDocument>>,
    cursor: usize,
}

impl HistoryStore {
    /// A history holding only `seed`.
    pub fn new(seed: ContentDocument) -> Self {
        Self {
            entries: vec![Arc::new(seed)],
            cursor: 0,
        }
    }

    /// The present snapshot.
    pub fn current(&self) -> &ContentDocument {
        &self.entries[self.cursor]
    }

    /// A shared handle to the present snapshot.
    pub fn current_arc(&self) -> Arc<ContentDocument> {
        Arc::clone(&self.entries[self.cursor])
    }

    /// Record `next` as the present state.
    ///
    /// Returns `false`, leaving the history untouched, when `next` is
    /// structurally equal to the present state.
    pub fn set_state(&mut self, next: ContentDocument) -> bool {
        if *self.current() == next {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(Arc::new(next));
        self.cursor = self.entries.len() - 1;

        tracing::trace!(
            "History now holds {} entries, cursor at {}",
            self.entries.len(),
            self.cursor
        );
        true
    }

    /// Step back one snapshot. Returns whether the cursor moved.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot. Returns whether the cursor moved.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots, present included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots before the present one, oldest first.
    pub fn past(&self) -> &[Arc<ContentDocument>] {
        &self.entries[..self.cursor]
    }

    /// Snapshots after the present one, nearest first.
    pub fn future(&self) -> &[Arc<ContentDocument>] {
        &self.entries[self.cursor + 1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Banner, Section, SectionKind};
    use pretty_assertions::assert_eq;

    fn doc(title: &str) -> ContentDocument {
        ContentDocument::new(
            Banner {
                title: title.to_string(),
                ..Default::default()
            },
            vec![],
        )
    }

    #[test]
    fn starts_with_seed_only() {
        let history = HistoryStore::new(doc("seed"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current().banner.title, "seed");
    }

    #[test]
    fn setting_the_current_state_is_a_no_op() {
        let mut history = HistoryStore::new(doc("seed"));
        history.set_state(doc("one"));

        assert!(!history.set_state(doc("one")));
        assert!(!history.set_state(history.current().clone()));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = HistoryStore::new(doc("seed"));
        let titles = ["a", "b", "c", "d"];
        for title in titles {
            assert!(history.set_state(doc(title)));
        }
        let last = history.current().clone();

        for _ in 0..titles.len() {
            assert!(history.undo());
        }
        assert_eq!(history.current(), &doc("seed"));

        for _ in 0..titles.len() {
            assert!(history.redo());
        }
        assert_eq!(history.current(), &last);
    }

    #[test]
    fn undo_and_redo_clamp_at_bounds() {
        let mut history = HistoryStore::new(doc("seed"));
        assert!(!history.undo());
        assert_eq!(history.cursor(), 0);

        history.set_state(doc("a"));
        assert!(!history.redo());
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn new_state_after_undo_drops_the_future() {
        let mut history = HistoryStore::new(doc("seed"));
        history.set_state(doc("a"));
        history.set_state(doc("b"));
        history.undo();
        history.undo();
        assert_eq!(history.future().len(), 2);

        history.set_state(doc("c"));

        assert_eq!(history.len(), 2);
        assert!(history.future().is_empty());
        assert!(!history.can_redo());
        assert_eq!(history.past().len(), 1);
        assert_eq!(history.current().banner.title, "c");
    }

    #[test]
    fn can_flags_follow_the_cursor() {
        let mut history = HistoryStore::new(doc("seed"));
        history.set_state(doc("a"));
        history.set_state(doc("b"));

        assert!(history.can_undo() && !history.can_redo());
        history.undo();
        assert!(history.can_undo() && history.can_redo());
        history.undo();
        assert!(!history.can_undo() && history.can_redo());
    }

    #[test]
    fn equality_is_structural_not_positional() {
        let base = ContentDocument::new(
            Banner::default(),
            vec![Section::new(1, SectionKind::Text, "A")],
        );
        let mut history = HistoryStore::new(base.clone());

        // A deep copy with fresh allocations is still the same state.
        let copy: ContentDocument =
            serde_json::from_str(&serde_json::to_string(&base).unwrap()).unwrap();
        assert!(!history.set_state(copy));
    }
}
