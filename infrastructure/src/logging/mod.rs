//! Logging infrastructure: structured round auditing.
//!
//! Provides [`JsonlAuditLog`], a JSONL file writer that implements
//! the [`ResolutionAuditLog`](witness_application::ResolutionAuditLog) port.

mod jsonl_audit;

pub use jsonl_audit::JsonlAuditLog;
