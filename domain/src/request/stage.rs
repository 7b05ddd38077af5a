//! Reduction stages
//!
//! A stage is a filter list followed by a reducer. The same shape is used
//! twice in a request: once per node over source retrievals (aggregation) and
//! once across nodes over their reports (tally).

use crate::core::error::{ConstructionError, ReduceError};
use crate::core::value::Value;
use crate::reducer::{Filter, Reducer, Reduction};
use serde::{Deserialize, Serialize};

/// Filters then a reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub reducer: Reducer,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl Stage {
    /// A stage without filters.
    pub fn new(reducer: Reducer) -> Self {
        Self {
            reducer,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Apply the filters, then reduce what is left.
    pub fn reduce(&self, values: Vec<Value>) -> Result<Reduction, ReduceError> {
        let filtered = Filter::apply_all(&self.filters, values);
        self.reducer.reduce(&filtered)
    }

    pub(crate) fn validate(&self, stage: &'static str) -> Result<(), ConstructionError> {
        for filter in &self.filters {
            filter
                .validate()
                .map_err(|reason| ConstructionError::InvalidFilter { stage, reason })?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.filters.is_empty() {
            return write!(f, "{}", self.reducer);
        }
        let filters: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
        write!(f, "{} after [{}]", self.reducer, filters.join(", "))
    }
}

/// Per-node reduction over source retrievals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationStage(pub Stage);

/// Cross-node reduction over aggregated reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TallyStage(pub Stage);

impl AggregationStage {
    pub fn stage(&self) -> &Stage {
        &self.0
    }
}

impl TallyStage {
    pub fn stage(&self) -> &Stage {
        &self.0
    }
}
