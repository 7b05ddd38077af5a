//! Configuration file loading for witness-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `WITNESS_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./witness.toml` or `./.witness.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/witness-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuditConfig, FileConfig, FileEngineConfig, FileOutputConfig, FileWitnessesConfig,
    WitnessBehaviour,
};
pub use loader::ConfigLoader;
