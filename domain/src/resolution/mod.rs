//! Resolution domain
//!
//! The pure half of a round: reducing one node's retrievals to a report,
//! reducing collected reports to a tally, and packaging the gate's decision.
//! Orchestration (fan-out, the collection barrier, cancellation) lives in the
//! application layer.
//!
//! ```text
//! retrievals ──► AggregationStage::run ──► Report
//! reports    ──► TallyStage::run ──► QuorumGate::evaluate ──► ResolutionResult
//! ```

pub mod aggregation;
pub mod report;
pub mod result;
pub mod round;
pub mod tally;

pub use report::{Report, ReportOutcome};
pub use result::ResolutionResult;
pub use round::{BarrierClose, RoundState};
pub use tally::TallyOutput;
