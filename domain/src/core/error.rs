//! Domain error types
//!
//! Errors are layered the same way a round is: construction errors are fatal
//! before submission, fetch and aggregation errors degrade a single node's
//! report, and tally errors only end a round when nothing survives.
//!
//! Everything past construction is serializable because it travels inside
//! reports and archived results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid request shape, detected while building a [`Request`](crate::Request).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Request has no sources")]
    NoSources,

    #[error("Request is missing its {0} stage")]
    MissingStage(&'static str),

    #[error("Request is missing its quorum")]
    MissingQuorum,

    #[error("Quorum minimum reports must be at least 1")]
    InvalidMinReports,

    #[error("Quorum agreement percent must be within 0..=100, got {0}")]
    InvalidAgreementPercent(u16),

    #[error("Economic parameter {field} must be non-negative, got {value}")]
    NegativeEconomicParameter { field: &'static str, value: i64 },

    #[error("Source #{index} is invalid: {reason}")]
    InvalidSource { index: usize, reason: String },

    #[error("Invalid {stage} filter: {reason}")]
    InvalidFilter { stage: &'static str, reason: String },
}

/// Failure of one retrieval from one source.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("Source timed out")]
    Timeout,

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed source output: {0}")]
    Malformed(String),

    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Failure of a reducer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReduceError {
    #[error("Cannot reduce an empty sequence")]
    EmptyInput,

    #[error("Reducer {reducer} cannot handle {found} values")]
    TypeMismatch { reducer: String, found: String },
}

/// Failure of one node's aggregation stage.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationError {
    /// The request's only source failed.
    #[error("Source unavailable: {cause}")]
    SourceUnavailable { cause: FetchError },

    /// Every one of several sources failed.
    #[error("All {failed} sources failed")]
    InsufficientSources { failed: usize },

    #[error("Aggregation reducer failed: {cause}")]
    Reduce { cause: ReduceError },
}

/// Failure of the cross-node tally stage.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TallyError {
    #[error("None of the {received} reports carried an aggregated value")]
    NoSuccessfulReports { received: usize },

    #[error("Tally reducer failed: {cause}")]
    Reduce { cause: ReduceError },
}

impl From<ReduceError> for AggregationError {
    fn from(cause: ReduceError) -> Self {
        AggregationError::Reduce { cause }
    }
}

impl From<ReduceError> for TallyError {
    fn from(cause: ReduceError) -> Self {
        TallyError::Reduce { cause }
    }
}
