//! Engine parameters: round timing and buffering.
//!
//! [`EngineParams`] groups the static parameters that control the
//! collection barrier and witness fetches of
//! [`ResolutionEngine`](crate::use_cases::resolve_request::ResolutionEngine).
//! These are application-layer concerns, not request policy: the same
//! request may be resolved under different engine parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round timing and buffering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Hard upper bound on how long the barrier waits for reports.
    pub collection_window: Duration,
    /// Extra wait once `min_reports` reports have arrived, capped by the
    /// collection window.
    pub grace_period: Duration,
    /// Per-source fetch timeout.
    pub fetch_timeout: Duration,
    /// Capacity of the bounded channel carrying witness events.
    pub report_channel_capacity: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            collection_window: Duration::from_secs(30),
            grace_period: Duration::from_secs(2),
            fetch_timeout: Duration::from_secs(10),
            report_channel_capacity: 64,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_collection_window(mut self, window: Duration) -> Self {
        self.collection_window = window;
        self
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Zero is raised to 1; a channel must hold at least one event.
    pub fn with_report_channel_capacity(mut self, capacity: usize) -> Self {
        self.report_channel_capacity = capacity.max(1);
        self
    }
}
