//! Port for the round audit log.
//!
//! Defines the [`ResolutionAuditLog`] trait for recording what happened in
//! each round (submissions, retrievals, reports, barrier and gate outcomes)
//! to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! record of every round.

use serde_json::{Value as Json, json};
use witness_domain::{BarrierClose, NodeId, Report, Request, RequestId, ResolutionResult};

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. Adapters add the timestamp when they write it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Event type identifier (e.g., "request_submitted", "report_received").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Json,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Json) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn request_submitted(id: RequestId, request: &Request) -> Self {
        Self::new(
            "request_submitted",
            json!({
                "request_id": id.to_string(),
                "content_hash": request.content_hash(),
                "sources": request.sources().len(),
                "quorum": request.quorum().to_string(),
            }),
        )
    }

    pub fn node_retrieved(id: RequestId, node: &NodeId, failed_sources: usize) -> Self {
        Self::new(
            "node_retrieved",
            json!({
                "request_id": id.to_string(),
                "node_id": node,
                "failed_sources": failed_sources,
            }),
        )
    }

    /// A report, accepted by the barrier or discarded as late.
    pub fn report_received(id: RequestId, report: &Report, late: bool) -> Self {
        Self::new(
            "report_received",
            json!({
                "request_id": id.to_string(),
                "node_id": report.node_id,
                "outcome": report.outcome,
                "late": late,
            }),
        )
    }

    pub fn barrier_closed(
        id: RequestId,
        closed_by: BarrierClose,
        reports: usize,
        late: usize,
    ) -> Self {
        Self::new(
            "barrier_closed",
            json!({
                "request_id": id.to_string(),
                "closed_by": closed_by,
                "reports": reports,
                "late_reports": late,
            }),
        )
    }

    pub fn round_resolved(id: RequestId, result: &ResolutionResult) -> Self {
        Self::new(
            "round_resolved",
            json!({
                "request_id": id.to_string(),
                "result": result,
            }),
        )
    }

    pub fn round_cancelled(id: RequestId) -> Self {
        Self::new("round_cancelled", json!({ "request_id": id.to_string() }))
    }
}

/// Port for recording audit events.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `record` method is synchronous and non-fallible: a failing audit sink
/// must never disturb a round.
pub trait ResolutionAuditLog: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl ResolutionAuditLog for NoAuditLog {
    fn record(&self, _event: AuditEvent) {}
}
