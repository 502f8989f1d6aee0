//! Error types for Postflux
//!
//! Classification itself never fails. These errors only come from the
//! boundaries: decoding feeds, encoding output and validating timestamps.

use thiserror::Error;

/// Errors that can occur at the edges of the engine
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Failed to parse post feed: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Post {index} has an unparseable created_at: {value:?}")]
    InvalidTimestamp { index: usize, value: String },
}
