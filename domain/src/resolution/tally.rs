//! Cross-node tally over collected reports.

use super::report::Report;
use crate::core::error::TallyError;
use crate::core::node::NodeId;
use crate::core::value::Value;
use crate::quorum::Agreement;
use crate::request::TallyStage;

/// Result of a successful tally.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyOutput {
    pub value: Value,
    /// Agreement over every report received, failed ones included.
    pub agreement: Agreement,
    /// Nodes whose values entered the reducer, in tally order.
    pub tallied: Vec<NodeId>,
}

impl TallyStage {
    /// Reduce the successful reports to the round's value.
    ///
    /// Values enter the reducer sorted by node id, whatever order the reports
    /// arrived in. Failed reports are left out of the reduction but still
    /// count in the agreement denominator.
    pub fn run(&self, reports: &[Report]) -> Result<TallyOutput, TallyError> {
        let received = reports.len();
        let mut successful: Vec<(&NodeId, &Value)> = reports
            .iter()
            .filter_map(|r| r.value().map(|v| (&r.node_id, v)))
            .collect();

        if successful.is_empty() {
            return Err(TallyError::NoSuccessfulReports { received });
        }

        successful.sort_by(|a, b| a.0.cmp(b.0));
        let tallied = successful.iter().map(|(id, _)| (*id).clone()).collect();
        let values = successful.into_iter().map(|(_, v)| v.clone()).collect();

        let reduction = self.stage().reduce(values)?;
        Ok(TallyOutput {
            value: reduction.value,
            agreement: Agreement::from_support(reduction.support, received),
            tallied,
        })
    }
}
