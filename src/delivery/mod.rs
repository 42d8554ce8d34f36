//! DeliveryLoop - Demand-Driven Image Delivery
//!
//! ## Responsibilities
//!
//! - Tick on a fixed interval and read the demand flag
//! - Push the slot content to the remote peer while demand is set
//! - Log every outcome to the event log, never propagate a failure
//!
//! Runs as the single long-lived background task. `stop()` ends the loop
//! cleanly, so tests and shutdown don't leave an unmanaged task behind. The
//! loop only ever reads the demand flag; clearing it is the peer's job via
//! the next `/receive-demand` notification.

use crate::demand_state::DemandState;
use crate::event_log::EventLog;
use crate::image_slot::ImageSlot;
use crate::peer_client::PeerClient;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;

/// DeliveryLoop instance
pub struct DeliveryLoop {
    slot: Arc<ImageSlot>,
    demand: Arc<DemandState>,
    peer: Arc<PeerClient>,
    event_log: Arc<EventLog>,
    tick_interval: Duration,
    running: Arc<RwLock<bool>>,
}

impl DeliveryLoop {
    /// Create new DeliveryLoop
    pub fn new(
        slot: Arc<ImageSlot>,
        demand: Arc<DemandState>,
        peer: Arc<PeerClient>,
        event_log: Arc<EventLog>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            slot,
            demand,
            peer,
            event_log,
            tick_interval,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the background loop
    pub async fn start(&self) {
        {
            let mut running = self.running.write().await;
            if *running {
                tracing::warn!("Delivery loop already running");
                return;
            }
            *running = true;
        }

        self.event_log.record("Started delivery loop.").await;

        let slot = self.slot.clone();
        let demand = self.demand.clone();
        let peer = self.peer.clone();
        let event_log = self.event_log.clone();
        let running = self.running.clone();
        let tick_interval = self.tick_interval;

        tokio::spawn(async move {
            let mut interval = interval(tick_interval);

            loop {
                interval.tick().await;

                {
                    let is_running = running.read().await;
                    if !*is_running {
                        break;
                    }
                }

                Self::run_tick(&slot, &demand, &peer, &event_log).await;
            }

            tracing::info!("Delivery loop stopped");
        });
    }

    /// Stop the background loop
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        tracing::info!("Stopping delivery loop");
    }

    /// Run a single tick (exposed for tests)
    pub async fn run_once(&self) {
        Self::run_tick(&self.slot, &self.demand, &self.peer, &self.event_log).await;
    }

    /// One tick: act on the demand flag
    async fn run_tick(
        slot: &ImageSlot,
        demand: &DemandState,
        peer: &PeerClient,
        event_log: &EventLog,
    ) {
        if !demand.get().await {
            event_log.record("Peer has not requested an image.").await;
            return;
        }

        event_log.record("Peer requested an image.").await;

        let bytes = match slot.read().await {
            Ok(bytes) => bytes,
            Err(_) => {
                event_log.record("No image found to send.").await;
                return;
            }
        };

        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let filename = slot.filename().await;

        match peer.deliver(encoded, filename).await {
            Ok(()) => {
                event_log.record("Image successfully sent to peer.").await;
            }
            Err(e) => {
                // Caught here; the next tick is the only further retry
                event_log
                    .record(&format!("Error sending image to peer: {}", e))
                    .await;
            }
        }
    }
}
