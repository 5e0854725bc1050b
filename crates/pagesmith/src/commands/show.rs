//! Print the current page.

use anyhow::Result;

use crate::config::ConfigFile;

/// Run the show command.
pub async fn run(config: &ConfigFile) -> Result<()> {
    let (gateway, _session) = super::connect(config).await?;
    let doc = gateway.load().await;

    println!("{}", serde_json::to_string_pretty(&doc)?);

    Ok(())
}
