//! Error types for the wiki client

use fedwiki_types::{IdError, Slug};
use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The site has no such page
    #[error("page {0} not found")]
    NotFound(Slug),

    /// The server rejected the request
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON going out or coming back
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad slug or site name
    #[error(transparent)]
    Id(#[from] IdError),

    /// The local page store failed
    #[error("local store error: {0}")]
    LocalStore(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
