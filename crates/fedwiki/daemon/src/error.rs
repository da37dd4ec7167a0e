//! Error types for the wiki daemon

use crate::remote::RemoteError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fedwiki_types::{IdError, Slug};
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stored bytes do not hold a page
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Site key that does not name a single farm directory
    #[error("Invalid site: {0:?}")]
    InvalidSite(String),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the action applier
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Caller may not write to this site
    #[error("Access forbidden")]
    Forbidden,

    /// `create` against a slug that already holds a page
    #[error("Page {0} already exists")]
    Conflict(Slug),

    /// Action type outside the known vocabulary
    #[error("unfamiliar action: {0}")]
    NotImplemented(String),

    /// Non-creating action against a missing page
    #[error("Page {0} not found")]
    NotFound(Slug),

    /// Action JSON that cannot be applied
    #[error("Invalid action: {0}")]
    BadRequest(String),

    /// Fetching the fork source failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Persisting the page failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Write attempted without access
    #[error("Access forbidden")]
    Forbidden,

    /// Unknown action type
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Another site failed us
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApplyError> for ApiError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::Forbidden => ApiError::Forbidden,
            ApplyError::Conflict(slug) => {
                ApiError::Conflict(format!("page {} already exists", slug))
            }
            ApplyError::NotImplemented(kind) => {
                ApiError::NotImplemented(format!("unfamiliar action: {}", kind))
            }
            ApplyError::NotFound(slug) => ApiError::NotFound(format!("page {}", slug)),
            ApplyError::BadRequest(msg) => ApiError::BadRequest(msg),
            ApplyError::Remote(err) => err.into(),
            ApplyError::Storage(err) => ApiError::Storage(err),
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        let message = err.to_string();
        match err {
            RemoteError::NotFound { .. } => ApiError::NotFound(message),
            _ => ApiError::Upstream(message),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotImplemented(_) => (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Storage(StorageError::InvalidSite(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotImplemented("test".to_string()).into_response().status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::Upstream("test".to_string()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Storage(StorageError::InvalidSite("..".to_string()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_apply_errors_map_to_api_errors() {
        let slug = Slug::parse("welcome").unwrap();
        assert!(matches!(
            ApiError::from(ApplyError::Conflict(slug.clone())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(ApiError::from(ApplyError::Forbidden), ApiError::Forbidden));
        assert!(matches!(
            ApiError::from(ApplyError::Remote(RemoteError::NotFound {
                site: "a.example".into(),
                slug,
            })),
            ApiError::NotFound(_)
        ));
    }
}
