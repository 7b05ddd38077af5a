//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collect_reports;
pub mod resolve_request;
pub mod retrieve_and_aggregate;
