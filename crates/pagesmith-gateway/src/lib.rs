//! Remote-or-local persistence for pagesmith content.
//!
//! The [`PersistenceGateway`] talks to the content API and degrades to a
//! [`LocalCache`] whenever the API is unreachable. Session state lives in an
//! explicit [`SessionContext`] backed by the same cache.

pub mod api;
pub mod cache;
pub mod error;
pub mod gateway;
pub mod session;

pub use api::{ApiConfig, ContentApi, HttpContentApi, ImageUpload, DEFAULT_API_URL};
pub use cache::{LocalCache, AUTH_KEY, CONTENT_KEY, PAGE_KEY, TOKEN_KEY};
pub use error::{CacheError, GatewayError, GatewayResult};
pub use gateway::PersistenceGateway;
pub use session::{Page, SessionContext};
