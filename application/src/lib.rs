//! Application layer for witness-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    audit_log::{AuditEvent, NoAuditLog, ResolutionAuditLog},
    progress::{NoProgress, ProgressNotifier},
    source_fetcher::SourceFetcher,
};
pub use use_cases::collect_reports::{Collection, CollectionPolicy, collect_reports};
pub use use_cases::resolve_request::{ResolutionEngine, ResolveError};
pub use use_cases::retrieve_and_aggregate::{NodeEvent, WitnessNode};
