//! Simulated witness set from TOML (`[witnesses]` section)
//!
//! ```toml
//! [witnesses]
//! count = 10
//! id_prefix = "witness-"
//! latency_ms = 50
//! failing = ["witness-03"]
//! silent = ["witness-07"]
//! ```
//!
//! Witness ids are the prefix followed by a zero-padded index, so byte-wise
//! ordering of ids matches numeric ordering.

use serde::{Deserialize, Serialize};

/// How a configured witness behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessBehaviour {
    Honest,
    /// Every fetch fails
    Failing,
    /// Fetches never complete
    Silent,
}

/// Raw witness set configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWitnessesConfig {
    /// Number of witnesses
    pub count: usize,
    /// Prefix of generated witness ids
    pub id_prefix: String,
    /// Fixed latency added to every fetch
    pub latency_ms: u64,
    /// Ids of witnesses whose fetches fail
    pub failing: Vec<String>,
    /// Ids of witnesses that never answer
    pub silent: Vec<String>,
}

impl Default for FileWitnessesConfig {
    fn default() -> Self {
        Self {
            count: 10,
            id_prefix: "witness-".to_string(),
            latency_ms: 0,
            failing: Vec::new(),
            silent: Vec::new(),
        }
    }
}

impl FileWitnessesConfig {
    /// Generated witness ids in order.
    pub fn ids(&self) -> Vec<String> {
        let width = self.count.saturating_sub(1).to_string().len().max(2);
        (0..self.count)
            .map(|i| format!("{}{:0width$}", self.id_prefix, i, width = width))
            .collect()
    }

    /// Behaviour of the witness with `id`. Silent wins over failing.
    pub fn behaviour_of(&self, id: &str) -> WitnessBehaviour {
        if self.silent.iter().any(|s| s == id) {
            WitnessBehaviour::Silent
        } else if self.failing.iter().any(|f| f == id) {
            WitnessBehaviour::Failing
        } else {
            WitnessBehaviour::Honest
        }
    }

    /// Failing or silent ids that name no generated witness.
    pub fn unknown_ids(&self) -> Vec<&str> {
        let ids = self.ids();
        self.failing
            .iter()
            .chain(self.silent.iter())
            .filter(|id| !ids.iter().any(|known| known == *id))
            .map(String::as_str)
            .collect()
    }
}
