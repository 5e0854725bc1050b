//! Session sign-in and sign-out.

use anyhow::{Context, Result};
use pagesmith_gateway::SessionContext;

use crate::config::ConfigFile;

pub async fn sign_in(config: &ConfigFile, token: String) -> Result<()> {
    let mut session = session(config).await?;
    session
        .sign_in(token)
        .await
        .context("Failed to store session")?;
    tracing::info!("Signed in; edits will be sent to {}", config.api.url);
    Ok(())
}

pub async fn sign_out(config: &ConfigFile) -> Result<()> {
    let mut session = session(config).await?;
    if !session.is_authenticated() {
        tracing::info!("Not signed in");
        return Ok(());
    }
    session.sign_out().await.context("Failed to clear session")?;
    tracing::info!("Signed out");
    Ok(())
}

async fn session(config: &ConfigFile) -> Result<SessionContext> {
    let cache = super::open_cache(config).await?;
    Ok(SessionContext::load(std::sync::Arc::new(cache)).await)
}
