//! Error types for the persistence layer.

/// Errors from the remote content API.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Errors from the local cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to write cache file {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to encode cache entry: {0}")]
    Encode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
