//! Infrastructure layer for witness-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: source fetchers, the JSONL audit log,
//! request file loading and configuration file loading.

pub mod config;
pub mod fetchers;
pub mod logging;
pub mod request_file;
pub mod witness_set;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileEngineConfig, FileOutputConfig,
    FileWitnessesConfig, WitnessBehaviour,
};
#[cfg(feature = "http-source")]
pub use fetchers::HttpFetcher;
pub use fetchers::{RandomFetcher, SimulatedFetcher, SourceRouter};
pub use logging::JsonlAuditLog;
pub use request_file::{RequestFileError, load_definition, load_request};
pub use witness_set::build_witnesses;
