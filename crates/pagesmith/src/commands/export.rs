//! Single-file export command.

use std::path::PathBuf;

use anyhow::Result;
use pagesmith_export::Exporter;
use pagesmith_model::BlobStore;

use crate::config::ConfigFile;

/// Run the export command.
pub async fn run(
    config: &ConfigFile,
    output: Option<PathBuf>,
    minify: Option<bool>,
    open: bool,
) -> Result<()> {
    let (gateway, _session) = super::connect(config).await?;
    let doc = gateway.load().await;

    // A fresh process holds no session blobs; any left in the document
    // are dropped from the export.
    let exporter = Exporter::new(config.export_config(minify), BlobStore::new());
    let dir = output.unwrap_or_else(|| config.export.output.clone());
    let result = exporter.export_to(&doc, &dir).await?;

    tracing::info!(
        "Wrote {} ({} bytes) in {}ms",
        result.path.display(),
        result.bytes,
        result.duration_ms
    );
    if result.images_dropped > 0 {
        tracing::warn!("{} unreadable images were left out", result.images_dropped);
    }

    if open {
        if let Err(e) = open::that(&result.path) {
            tracing::warn!("Failed to open {}: {}", result.path.display(), e);
        }
    }

    Ok(())
}
