//! DemandState - Peer Demand Flag
//!
//! A process-wide boolean set by inbound `/receive-demand` notifications and
//! read by the delivery loop. The loop never writes it, so the inbound
//! endpoint stays the flag's only writer.

use tokio::sync::RwLock;

/// DemandState instance
pub struct DemandState {
    wanted: RwLock<bool>,
}

impl DemandState {
    /// Create new DemandState, initially false
    pub fn new() -> Self {
        Self {
            wanted: RwLock::new(false),
        }
    }

    /// Set the flag, returning the previous value so callers can log the transition
    pub async fn set(&self, wanted: bool) -> bool {
        let mut flag = self.wanted.write().await;
        std::mem::replace(&mut *flag, wanted)
    }

    /// Current flag value
    pub async fn get(&self) -> bool {
        *self.wanted.read().await
    }
}

impl Default for DemandState {
    fn default() -> Self {
        Self::new()
    }
}
