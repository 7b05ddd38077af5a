//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod audit;
mod engine;
mod output;
mod witnesses;

pub use audit::FileAuditConfig;
pub use engine::FileEngineConfig;
pub use output::FileOutputConfig;
pub use witnesses::{FileWitnessesConfig, WitnessBehaviour};

use serde::{Deserialize, Serialize};
use witness_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Collection barrier and fetch timing
    pub engine: FileEngineConfig,
    /// Simulated witness set
    pub witnesses: FileWitnessesConfig,
    /// Round audit log
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are worth logging.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let engine = &self.engine;

        if engine.collection_window_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCollectionWindow,
                "engine.collection_window_ms cannot be 0",
            ));
        }
        if engine.grace_period_ms > engine.collection_window_ms {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::GraceExceedsWindow,
                format!(
                    "engine.grace_period_ms ({}) exceeds collection_window_ms ({}); the window wins",
                    engine.grace_period_ms, engine.collection_window_ms
                ),
            ));
        }
        if engine.fetch_timeout_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroFetchTimeout,
                "engine.fetch_timeout_ms cannot be 0",
            ));
        }
        if engine.report_channel_capacity == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroChannelCapacity,
                "engine.report_channel_capacity cannot be 0",
            ));
        }

        if self.witnesses.count == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoWitnesses,
                "witnesses.count cannot be 0",
            ));
        }
        for id in self.witnesses.unknown_ids() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownWitness,
                format!("witnesses: '{}' names no configured witness", id),
            ));
        }

        issues
    }
}
