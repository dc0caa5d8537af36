//! Receiver-side connection liveness.
//!
//! There is no heartbeat on the wire; the sender is considered present
//! while frames keep arriving. After `grace` without a successful frame
//! the receiver tears its display down, once per disconnection.

use std::time::{Duration, Instant};

/// Default grace window before a silent sender counts as disconnected.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct LivenessTracker {
    last_frame: Instant,
    grace: Duration,
    connected: bool,
}

impl LivenessTracker {
    /// A tracker that has not seen any frame yet, as of `now`.
    pub fn new(grace: Duration, now: Instant) -> Self {
        Self {
            last_frame: now,
            grace,
            connected: false,
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }

    /// A frame was rendered at `now`.
    pub fn record_frame(&mut self, now: Instant) {
        self.last_frame = now;
        self.connected = true;
    }

    /// An attempt failed or timed out at `now`. Returns `true` exactly
    /// once when the grace window has just been exceeded.
    pub fn on_idle(&mut self, now: Instant) -> bool {
        if self.connected && now.saturating_duration_since(self.last_frame) > self.grace {
            self.connected = false;
            return true;
        }
        false
    }
}
