//! Editing core for pagesmith pages.
//!
//! [`HistoryStore`] keeps undoable snapshots, the [`reorder`] module turns
//! drag telemetry into moves, and [`Editor`] ties both to the persistence
//! gateway.

pub mod editor;
pub mod history;
pub mod reorder;

pub use editor::Editor;
pub use history::HistoryStore;
pub use reorder::{reorder, DragSession, MoveCommand, PointerState, Rect};
