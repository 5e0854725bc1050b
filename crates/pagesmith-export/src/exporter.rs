//! Single-file HTML export.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::Mutex;

use pagesmith_model::{BlobSource, ContentDocument};

use crate::assets::AssetPipeline;
use crate::resolve::ResolvedImages;
use crate::templates::{PageContext, TemplateEngine};

/// Configuration for exporting a page.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Name of the written file
    pub file_name: String,

    /// Minify the embedded stylesheet
    pub minify: bool,

    /// `<title>` used when the banner has none
    pub fallback_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "my-website.html".to_string(),
            minify: true,
            fallback_title: "My Website".to_string(),
        }
    }
}

/// A rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The complete HTML document
    pub html: String,

    /// Local images embedded as data URIs
    pub images_embedded: usize,

    /// Local images that could not be read and were left out
    pub images_dropped: usize,
}

/// Result of an export to disk.
#[derive(Debug)]
pub struct ExportResult {
    /// Written file
    pub path: PathBuf,

    /// Size of the written file in bytes
    pub bytes: usize,

    pub images_embedded: usize,
    pub images_dropped: usize,

    /// Total export time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Renders documents into self-contained HTML files.
///
/// Exports are serialized: a second export waits for the one in flight.
pub struct Exporter<S: BlobSource> {
    config: ExportConfig,
    source: S,
    templates: TemplateEngine,
    in_flight: Mutex<()>,
}

impl<S: BlobSource> Exporter<S> {
    /// Create an exporter reading local images from `source`.
    pub fn new(config: ExportConfig, source: S) -> Self {
        Self {
            config,
            source,
            templates: TemplateEngine::new(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Whether an export is currently running.
    pub fn is_exporting(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Render `doc` to a complete HTML document.
    pub async fn export(&self, doc: &ContentDocument) -> Result<String, ExportError> {
        Ok(self.render(doc).await?.html)
    }

    /// Render `doc` with embedding statistics.
    pub async fn render(&self, doc: &ContentDocument) -> Result<RenderedPage, ExportError> {
        let _guard = self.in_flight.lock().await;

        let images = ResolvedImages::collect(doc, &self.source).await;
        let stylesheet = AssetPipeline::embedded_stylesheet(self.config.minify);
        let context = PageContext::build(doc, &images, &self.config.fallback_title, stylesheet);

        let html = self
            .templates
            .render_page(&context)
            .map_err(|e| ExportError::TemplateError(e.to_string()))?;

        tracing::debug!(
            "Rendered page with {} sections ({} bytes)",
            doc.sections.len(),
            html.len()
        );

        Ok(RenderedPage {
            html,
            images_embedded: images.embedded_count(),
            images_dropped: images.failed().len(),
        })
    }

    /// Render `doc` and write it into `dir` under the configured file name.
    pub async fn export_to(
        &self,
        doc: &ContentDocument,
        dir: &Path,
    ) -> Result<ExportResult, ExportError> {
        let start = Instant::now();
        let page = self.render(doc).await?;

        let write_error = |path: &Path, e: std::io::Error| ExportError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| write_error(dir, e))?;

        let path = dir.join(&self.config.file_name);
        tokio::fs::write(&path, &page.html)
            .await
            .map_err(|e| write_error(&path, e))?;

        tracing::info!("Exported {}", path.display());

        Ok(ExportResult {
            path,
            bytes: page.html.len(),
            images_embedded: page.images_embedded,
            images_dropped: page.images_dropped,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
