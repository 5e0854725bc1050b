//! Content API server command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pagesmith_server::ContentServer;

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(config: &ConfigFile, port: Option<u16>, data: Option<PathBuf>) -> Result<()> {
    let server_config = config.server_config(port, data);
    if server_config.token.is_none() {
        tracing::warn!("No server token configured; anyone can change the content");
    }

    let server = ContentServer::new(server_config)
        .await
        .context("Failed to prepare data directory")?;

    server.start().await?;

    Ok(())
}
