//! Shared request/response models
//!
//! Types crossing the HTTP boundary, shared between handlers and tests.

use serde::{Deserialize, Serialize};

fn default_filename() -> String {
    "latest.png".to_string()
}

/// Body of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Base64-encoded image content
    pub image: String,
    /// Advisory filename, echoed back by queries
    #[serde(default = "default_filename")]
    pub filename: String,
}

/// Body of `POST /receive-demand`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandNotice {
    /// Whether the peer currently wants the latest image
    #[serde(default)]
    pub demand: bool,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

impl Ack {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }
}

/// Response of `GET /check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: String,
    pub image_available: bool,
}

/// Response of `GET /get-latest-image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestImageResponse {
    pub status: String,
    pub filename: String,
    pub image_base64: String,
}
