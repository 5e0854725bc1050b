//! CLI command implementations.

pub mod edit;
pub mod export;
pub mod init;
pub mod login;
pub mod serve;
pub mod show;

use std::sync::Arc;

use anyhow::{Context, Result};
use pagesmith_gateway::{HttpContentApi, LocalCache, PersistenceGateway, SessionContext};

use crate::config::ConfigFile;

/// Open the cache, restore the session and build a gateway that sends the
/// session's token.
pub async fn connect(config: &ConfigFile) -> Result<(PersistenceGateway, SessionContext)> {
    let cache = Arc::new(open_cache(config).await?);
    let session = SessionContext::load(Arc::clone(&cache)).await;

    let token = session.token().map(str::to_string);
    let api = HttpContentApi::new(config.api_config(token)).context("Failed to build API client")?;
    tracing::debug!("Using content API at {}", api.base_url());

    Ok((PersistenceGateway::new(api, cache), session))
}

pub async fn open_cache(config: &ConfigFile) -> Result<LocalCache> {
    if let Some(parent) = config.cache.path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(LocalCache::open(&config.cache.path).await)
}
