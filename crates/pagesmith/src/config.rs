//! `pagesmith.toml` handling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use pagesmith_export::ExportConfig;
use pagesmith_gateway::{ApiConfig, DEFAULT_API_URL};
use pagesmith_server::ServerConfig;

/// Environment variable that overrides `api.url`.
pub const API_URL_ENV: &str = "PAGESMITH_API_URL";

/// Configuration file structure (pagesmith.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            file_name: default_file_name(),
            minify: default_minify(),
            title: default_title(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: default_port(),
            token: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_cache_path() -> PathBuf {
    PathBuf::from(".pagesmith/cache.json")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_file_name() -> String {
    "my-website.html".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_title() -> String {
    "My Website".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_port() -> u16 {
    3001
}

impl ConfigFile {
    /// Load configuration from `path` if it exists, then apply environment
    /// overrides. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url(url);
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_api_url(&mut self, url: String) {
        if !url.trim().is_empty() {
            self.api.url = url;
        }
    }

    pub fn api_config(&self, token: Option<String>) -> ApiConfig {
        ApiConfig {
            base_url: self.api.url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            token,
        }
    }

    pub fn export_config(&self, minify: Option<bool>) -> ExportConfig {
        ExportConfig {
            file_name: self.export.file_name.clone(),
            minify: minify.unwrap_or(self.export.minify),
            fallback_title: self.export.title.clone(),
        }
    }

    pub fn server_config(&self, port: Option<u16>, data_dir: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            data_dir: data_dir.unwrap_or_else(|| self.server.data_dir.clone()),
            port: port.unwrap_or(self.server.port),
            token: self.server.token.clone(),
            ..Default::default()
        }
    }
}

/// The file `pagesmith init` writes.
pub const DEFAULT_CONFIG: &str = r#"# pagesmith configuration

[api]
# Content API base URL (PAGESMITH_API_URL overrides this)
url = "http://localhost:3001/api"

# Request timeout in seconds
timeout_secs = 10

[cache]
# Local cache used when the API is unreachable
path = ".pagesmith/cache.json"

[export]
# Directory the exported page is written to
output = "dist"
file_name = "my-website.html"
minify = true

# Page title when the banner has none
title = "My Website"

[server]
# Where `pagesmith serve` keeps content.json and uploaded images
data_dir = "data"
port = 3001
# token = "change-me"
"#;
