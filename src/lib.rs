//! Edge Relay
//!
//! Single-slot image relay between an edge device and a remote peer.
//!
//! ## Architecture (6 Components)
//!
//! 1. EventLog - Timestamped event recording (file + console mirror)
//! 2. ImageSlot - Latest-image storage with atomic replace
//! 3. DemandState - Peer demand flag (written only by /receive-demand)
//! 4. PeerClient - Outbound HTTP to the remote peer
//! 5. DeliveryLoop - Background demand-driven delivery
//! 6. WebAPI - REST API endpoints
//!
//! ## Design Principles
//!
//! - All shared state lives in an explicit AppState, no process-wide singletons
//! - Last-write-wins on the slot and the demand flag, no merging
//! - No failure ever terminates the process or the delivery loop

pub mod delivery;
pub mod demand_state;
pub mod error;
pub mod event_log;
pub mod image_slot;
pub mod models;
pub mod peer_client;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::{AppConfig, AppState};
