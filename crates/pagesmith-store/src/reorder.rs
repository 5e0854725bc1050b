//! Drag-to-reorder decisions.
//!
//! The host list feeds pointer positions in while a section is dragged; the
//! functions here decide when the dragged section should trade places with
//! the one under the pointer. Nothing here knows about widgets or events.

use pagesmith_model::ContentDocument;

/// Vertical extent of a widget in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Half the widget height, measured from its top edge.
    pub fn half_height(&self) -> f64 {
        (self.bottom - self.top) / 2.0
    }
}

/// Pointer position over the hovered widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Pointer Y in client coordinates.
    pub client_y: f64,

    /// Bounding box of the widget under the pointer.
    pub hover_rect: Rect,
}

/// Move the section at `from` so it ends up at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub from: usize,
    pub to: usize,
}

impl MoveCommand {
    /// The document with the move applied.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the section list.
    pub fn apply(&self, doc: &ContentDocument) -> ContentDocument {
        doc.with_section_moved(self.from, self.to)
    }
}

/// Decide whether hovering `hover_index` while dragging the item at
/// `drag_index` should move it.
///
/// The move waits until the pointer has crossed the middle of the hovered
/// widget in the direction of travel, so the list does not flicker while
/// the pointer sits near an edge.
pub fn reorder(drag_index: usize, hover_index: usize, pointer: PointerState) -> Option<MoveCommand> {
    if drag_index == hover_index {
        return None;
    }

    let middle = pointer.hover_rect.half_height();
    let offset = pointer.client_y - pointer.hover_rect.top;

    if drag_index < hover_index && offset < middle {
        return None;
    }
    if drag_index > hover_index && offset > middle {
        return None;
    }

    Some(MoveCommand {
        from: drag_index,
        to: hover_index,
    })
}

/// One drag gesture over the section list.
///
/// Tracks where the dragged section currently sits so that successive hover
/// events are measured against its latest position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    index: usize,
}

impl DragSession {
    /// Start dragging the section at `index`.
    pub fn start(index: usize) -> Self {
        Self { index }
    }

    /// Current index of the dragged section.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Feed one hover event. Emits at most one move.
    pub fn hover(&mut self, hover_index: usize, pointer: PointerState) -> Option<MoveCommand> {
        let command = reorder(self.index, hover_index, pointer)?;
        self.index = hover_index;
        Some(command)
    }

    /// End the gesture on drop. The list already reflects the last move,
    /// so this only reports where the section landed.
    pub fn finish(self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::{Banner, Section, SectionKind};
    use pretty_assertions::assert_eq;

    /// Rows are 100px tall and stacked from y = 0.
    fn over_row(row: usize, offset: f64) -> PointerState {
        let top = row as f64 * 100.0;
        PointerState {
            client_y: top + offset,
            hover_rect: Rect::new(top, top + 100.0),
        }
    }

    #[test]
    fn hovering_itself_does_nothing() {
        assert_eq!(reorder(2, 2, over_row(2, 90.0)), None);
    }

    #[test]
    fn dragging_down_waits_for_the_midpoint() {
        assert_eq!(reorder(0, 1, over_row(1, 20.0)), None);
        assert_eq!(reorder(0, 1, over_row(1, 49.0)), None);
        assert_eq!(
            reorder(0, 1, over_row(1, 60.0)),
            Some(MoveCommand { from: 0, to: 1 })
        );
    }

    #[test]
    fn dragging_up_waits_for_the_midpoint() {
        assert_eq!(reorder(3, 1, over_row(1, 80.0)), None);
        assert_eq!(
            reorder(3, 1, over_row(1, 40.0)),
            Some(MoveCommand { from: 3, to: 1 })
        );
    }

    #[test]
    fn exactly_on_the_midpoint_moves() {
        assert!(reorder(0, 1, over_row(1, 50.0)).is_some());
        assert!(reorder(2, 1, over_row(1, 50.0)).is_some());
    }

    #[test]
    fn session_tracks_the_dragged_index() {
        let mut session = DragSession::start(0);

        // Still above the middle of row 1: nothing yet.
        assert_eq!(session.hover(1, over_row(1, 10.0)), None);
        assert_eq!(session.index(), 0);

        assert_eq!(
            session.hover(1, over_row(1, 70.0)),
            Some(MoveCommand { from: 0, to: 1 })
        );
        assert_eq!(session.index(), 1);

        // The same hover again is now a hover over itself.
        assert_eq!(session.hover(1, over_row(1, 70.0)), None);

        assert_eq!(
            session.hover(2, over_row(2, 55.0)),
            Some(MoveCommand { from: 1, to: 2 })
        );
        assert_eq!(session.finish(), 2);
    }

    #[test]
    fn applying_a_move_reorders_sections() {
        let doc = ContentDocument::new(
            Banner::default(),
            vec![
                Section::new(1, SectionKind::Text, "A"),
                Section::new(2, SectionKind::Text, "B"),
                Section::new(3, SectionKind::Text, "C"),
            ],
        );

        let moved = MoveCommand { from: 2, to: 0 }.apply(&doc);

        let ids: Vec<u64> = moved.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
