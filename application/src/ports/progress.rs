//! Progress notification port
//!
//! Defines the interface for reporting progress while a round resolves.

use witness_domain::{BarrierClose, NodeId, Report, RequestId, ResolutionResult};

/// Callback for progress updates during a resolution round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when witness tasks are launched
    fn on_round_start(&self, request: RequestId, witnesses: usize);

    /// Called when a witness finished fetching its sources
    fn on_node_retrieved(&self, _node: &NodeId, _failed_sources: usize) {}

    /// Called for each report accepted by the collection barrier
    fn on_report(&self, report: &Report);

    /// Called when the collection barrier closes
    fn on_barrier_closed(&self, closed_by: BarrierClose, reports: usize);

    /// Called once the gate has decided
    fn on_round_complete(&self, _result: &ResolutionResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _request: RequestId, _witnesses: usize) {}
    fn on_report(&self, _report: &Report) {}
    fn on_barrier_closed(&self, _closed_by: BarrierClose, _reports: usize) {}
}
