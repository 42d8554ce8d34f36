//! Error handling for the relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not found (no image stored yet)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (missing/invalid field, bad base64)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote peer unreachable or returned a non-success response
    #[error("Peer error: {0}")]
    Peer(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Peer(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Error::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            Error::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Error::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        // A missing image is an expected condition, not a failure
        if matches!(self, Error::NotFound(_)) {
            tracing::debug!(status = %status, message = %message, "Request ended not-found");
        } else {
            tracing::error!(status = %status, message = %message, "Request error");
        }

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}
