//! Application state
//!
//! Holds all shared components and configuration

use crate::demand_state::DemandState;
use crate::event_log::EventLog;
use crate::image_slot::ImageSlot;
use crate::peer_client::PeerClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the single latest image
    pub upload_dir: PathBuf,
    /// Append-only event log file
    pub log_file: PathBuf,
    /// Remote peer upload endpoint (image delivery target)
    pub peer_upload_url: String,
    /// Seconds between delivery loop ticks
    pub delivery_interval_secs: u64,
    /// Timeout for outbound peer requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("latest")),
            log_file: std::env::var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs.txt")),
            peer_upload_url: std::env::var("PEER_UPLOAD_URL")
                .unwrap_or_else(|_| "http://localhost:9000/upload".to_string()),
            delivery_interval_secs: std::env::var("DELIVERY_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

/// Application state shared across handlers and the delivery loop
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: AppConfig,
    /// Latest-image slot
    pub slot: Arc<ImageSlot>,
    /// Event log (file + console mirror)
    pub event_log: Arc<EventLog>,
    /// Demand flag set by the remote peer
    pub demand: Arc<DemandState>,
    /// Outbound client for the remote peer
    pub peer: Arc<PeerClient>,
}
