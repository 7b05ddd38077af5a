//! Node reports

use crate::core::error::AggregationError;
use crate::core::node::NodeId;
use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// One node's contribution to a round: its aggregated value, or why it could
/// not produce one.
///
/// Reports live only as long as the round that collected them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub node_id: NodeId,
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Aggregated { value: Value },
    Failed { error: AggregationError },
}

impl Report {
    pub fn aggregated(node_id: impl Into<NodeId>, value: Value) -> Self {
        Self {
            node_id: node_id.into(),
            outcome: ReportOutcome::Aggregated { value },
        }
    }

    pub fn failed(node_id: impl Into<NodeId>, error: AggregationError) -> Self {
        Self {
            node_id: node_id.into(),
            outcome: ReportOutcome::Failed { error },
        }
    }

    /// Build a report from the result of an aggregation stage.
    pub fn from_result(node_id: impl Into<NodeId>, result: Result<Value, AggregationError>) -> Self {
        match result {
            Ok(value) => Self::aggregated(node_id, value),
            Err(error) => Self::failed(node_id, error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Aggregated { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.outcome {
            ReportOutcome::Aggregated { value } => Some(value),
            ReportOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AggregationError> {
        match &self.outcome {
            ReportOutcome::Aggregated { .. } => None,
            ReportOutcome::Failed { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;

    #[test]
    fn test_from_result() {
        let ok = Report::from_result("n1", Ok(Value::Integer(3)));
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&Value::Integer(3)));

        let err = Report::from_result(
            "n2",
            Err(AggregationError::SourceUnavailable {
                cause: FetchError::Timeout,
            }),
        );
        assert!(!err.is_success());
        assert!(err.value().is_none());
        assert!(err.error().is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let report = Report::aggregated("n1", Value::Boolean(true));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["node_id"], "n1");
        assert_eq!(json["outcome"]["status"], "aggregated");
        assert_eq!(json["outcome"]["value"]["type"], "boolean");
    }
}
