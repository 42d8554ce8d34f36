//! PeerClient - Outbound HTTP to the Remote Peer
//!
//! ## Responsibilities
//!
//! - Deliver the latest image to the peer's upload endpoint
//! - Bound every outbound call with connect and request timeouts
//! - Retry transient failures a fixed number of times with backoff
//!
//! Every outbound call is bounded by connect and request timeouts and a
//! fixed retry budget; nothing here waits on a stalled peer indefinitely.

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Total attempts per delivery (1 initial + 2 retries)
const DELIVERY_ATTEMPTS: u32 = 3;

/// Initial backoff between attempts, doubled after each failure
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Delivery payload sent to the peer's upload endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryPayload {
    /// Base64-encoded image content
    pub image: String,
    /// Advisory filename
    pub filename: String,
}

/// PeerClient instance
#[derive(Clone)]
pub struct PeerClient {
    http: Client,
    upload_url: String,
}

impl PeerClient {
    /// Create new PeerClient targeting `upload_url`
    pub fn new(upload_url: String, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, upload_url })
    }

    /// Deliver a base64-encoded image to the peer's upload endpoint
    pub async fn deliver(&self, image_base64: String, filename: String) -> Result<()> {
        let payload = DeliveryPayload {
            image: image_base64,
            filename,
        };

        let mut backoff = INITIAL_BACKOFF;
        let mut last_error = None;

        for attempt in 1..=DELIVERY_ATTEMPTS {
            match self.try_deliver(&payload).await {
                Ok(()) => {
                    tracing::debug!(
                        attempt,
                        url = %self.upload_url,
                        "Image delivered to peer"
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        url = %self.upload_url,
                        error = %e,
                        "Delivery attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < DELIVERY_ATTEMPTS {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::Peer("Delivery failed with no recorded error".to_string())))
    }

    async fn try_deliver(&self, payload: &DeliveryPayload) -> Result<()> {
        let resp = self
            .http
            .post(&self.upload_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Peer(format!("Peer unreachable: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::Peer(format!(
                "Peer upload returned {}",
                resp.status()
            )));
        }

        Ok(())
    }
}
