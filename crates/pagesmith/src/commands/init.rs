//! Write a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DEFAULT_CONFIG;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    tokio::fs::write(config_path, DEFAULT_CONFIG)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'pagesmith serve' to start the content API.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pagesmith.toml");
        std::fs::write(&path, "# mine").unwrap();

        run(&path, false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        run(&path, true).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
