//! Per-node aggregation over source retrievals.

use crate::core::error::{AggregationError, FetchError};
use crate::core::value::Value;
use crate::request::AggregationStage;

impl AggregationStage {
    /// Reduce one node's retrievals to its reported value.
    ///
    /// `retrievals` must be in source declaration order. With a single
    /// source any failure fails the stage; with several, failed sources are
    /// dropped and the stage only fails when none survive.
    pub fn run(&self, retrievals: Vec<Result<Value, FetchError>>) -> Result<Value, AggregationError> {
        let total = retrievals.len();
        let mut values = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for retrieval in retrievals {
            match retrieval {
                Ok(value) => values.push(value),
                Err(e) => failures.push(e),
            }
        }

        if total == 1 {
            if let Some(cause) = failures.pop() {
                return Err(AggregationError::SourceUnavailable { cause });
            }
        } else if values.is_empty() && !failures.is_empty() {
            return Err(AggregationError::InsufficientSources {
                failed: failures.len(),
            });
        }

        let reduction = self.stage().reduce(values)?;
        Ok(reduction.value)
    }
}
