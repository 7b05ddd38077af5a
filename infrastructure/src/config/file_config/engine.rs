//! Engine configuration from TOML (`[engine]` section)
//!
//! ```toml
//! [engine]
//! collection_window_ms = 30000
//! grace_period_ms = 2000
//! fetch_timeout_ms = 10000
//! report_channel_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use witness_application::EngineParams;

/// Raw engine timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Upper bound on how long a round waits for reports
    pub collection_window_ms: u64,
    /// Extra wait after the quorum's minimum report count is reached
    pub grace_period_ms: u64,
    /// Timeout for each source fetch
    pub fetch_timeout_ms: u64,
    /// Capacity of the witness event channel
    pub report_channel_capacity: usize,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            collection_window_ms: params.collection_window.as_millis() as u64,
            grace_period_ms: params.grace_period.as_millis() as u64,
            fetch_timeout_ms: params.fetch_timeout.as_millis() as u64,
            report_channel_capacity: params.report_channel_capacity,
        }
    }
}

impl FileEngineConfig {
    /// Convert to application-layer engine parameters
    pub fn to_engine_params(&self) -> EngineParams {
        EngineParams::default()
            .with_collection_window(Duration::from_millis(self.collection_window_ms))
            .with_grace_period(Duration::from_millis(self.grace_period_ms))
            .with_fetch_timeout(Duration::from_millis(self.fetch_timeout_ms))
            .with_report_channel_capacity(self.report_channel_capacity)
    }
}
