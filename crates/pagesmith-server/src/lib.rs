//! Reference content API for pagesmith.
//!
//! Stores the page document as a JSON file and uploaded images in a
//! directory, and serves both over HTTP.

pub mod server;

pub use server::{ContentServer, ServerConfig, ServerError};
