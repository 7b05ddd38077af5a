//! Fluent request construction.
//!
//! The builder only accumulates a [`RequestDefinition`]; all checks happen
//! once in [`RequestBuilder::build`], which yields an immutable request.

use super::Request;
use super::definition::{QuorumDefinition, RequestDefinition};
use super::stage::Stage;
use crate::core::error::ConstructionError;
use crate::source::SourceDescriptor;

/// Builder for [`Request`].
///
/// # Example
///
/// ```
/// use witness_domain::{Reducer, Request, SourceDescriptor, Stage};
///
/// let request = Request::builder()
///     .add_source(SourceDescriptor::random())
///     .aggregation(Stage::new(Reducer::Mode))
///     .tally(Stage::new(Reducer::ConcatenateAndHash))
///     .quorum(8, 51)
///     .fees(100_000_000, 1_000_000)
///     .collateral(10_000_000_000)
///     .build()
///     .unwrap();
/// assert_eq!(request.quorum().min_reports(), 8);
///
/// // No sources is a construction error
/// assert!(Request::builder().build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    definition: RequestDefinition,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(mut self, source: SourceDescriptor) -> Self {
        self.definition.sources.push(source);
        self
    }

    pub fn aggregation(mut self, stage: Stage) -> Self {
        self.definition.aggregation = Some(stage);
        self
    }

    pub fn tally(mut self, stage: Stage) -> Self {
        self.definition.tally = Some(stage);
        self
    }

    pub fn quorum(mut self, min_reports: u32, min_agreement_percent: u16) -> Self {
        self.definition.quorum = Some(QuorumDefinition {
            min_reports,
            min_agreement_percent,
        });
        self
    }

    /// Set the retrieval fee and the aggregation fee.
    pub fn fees(mut self, retrieval_fee: i64, aggregation_fee: i64) -> Self {
        self.definition.economics.retrieval_fee = retrieval_fee;
        self.definition.economics.aggregation_fee = aggregation_fee;
        self
    }

    pub fn collateral(mut self, collateral: i64) -> Self {
        self.definition.economics.collateral = collateral;
        self
    }

    pub fn build(self) -> Result<Request, ConstructionError> {
        Request::try_from(self.definition)
    }
}
