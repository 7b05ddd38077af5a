//! Resolution results

use super::report::Report;
use super::round::BarrierClose;
use super::tally::TallyOutput;
use crate::core::error::TallyError;
use crate::core::node::NodeId;
use crate::core::value::Value;
use crate::quorum::{GateDecision, RejectionReason};
use crate::request::Request;
use serde::{Deserialize, Serialize};

/// Terminal artifact of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub outcome: GateDecision,
    /// Reports collected before the barrier closed, failed ones included.
    pub participating_report_count: usize,
    /// Agreement reported by the tally reducer; 0.0 when the tally failed.
    pub agreement_fraction: f64,
    /// Nodes whose values entered the tally, in tally order.
    pub tallied_nodes: Vec<NodeId>,
    pub closed_by: BarrierClose,
}

impl ResolutionResult {
    /// Run the tally and the quorum gate over a closed collection.
    pub fn settle(request: &Request, reports: &[Report], closed_by: BarrierClose) -> Self {
        Self::from_tally(request, reports, request.tally().run(reports), closed_by)
    }

    /// Run the quorum gate over an already computed tally.
    pub fn from_tally(
        request: &Request,
        reports: &[Report],
        tally: Result<TallyOutput, TallyError>,
        closed_by: BarrierClose,
    ) -> Self {
        let outcome = request.quorum().evaluate(reports.len(), &tally);

        let (agreement_fraction, tallied_nodes) = match tally {
            Ok(output) => (output.agreement.fraction(), output.tallied),
            Err(_) => (0.0, Vec::new()),
        };

        Self {
            outcome,
            participating_report_count: reports.len(),
            agreement_fraction,
            tallied_nodes,
            closed_by,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }

    pub fn final_value(&self) -> Option<&Value> {
        match &self.outcome {
            GateDecision::Accept { value, .. } => Some(value),
            GateDecision::Reject { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match &self.outcome {
            GateDecision::Accept { .. } => None,
            GateDecision::Reject { reason } => Some(reason),
        }
    }
}
