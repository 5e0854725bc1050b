//! Self-contained HTML export for pagesmith pages.
//!
//! Renders a [`ContentDocument`](pagesmith_model::ContentDocument) into one
//! HTML file with its stylesheet and every session-local image embedded, so
//! the result opens anywhere without the editor or the backend.

pub mod assets;
pub mod exporter;
pub mod resolve;
pub mod style;
pub mod templates;

pub use exporter::{ExportConfig, ExportError, ExportResult, Exporter, RenderedPage};
pub use resolve::{embed_local_images, ResolvedImages};
