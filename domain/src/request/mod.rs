//! Requests
//!
//! A [`Request`] is the unit of work submitted to the resolution engine: an
//! ordered list of sources, one aggregation stage, one tally stage, a quorum
//! gate and economic parameters. It is validated once at construction and
//! immutable afterwards.
//!
//! Source order matters: retrievals are reduced in declaration order, which
//! is what makes `mode` tie-breaks deterministic.

pub mod builder;
pub mod definition;
pub mod economics;
pub mod stage;

pub use builder::RequestBuilder;
pub use definition::{EconomicsDefinition, QuorumDefinition, RequestDefinition};
pub use economics::EconomicParameters;
pub use stage::{AggregationStage, Stage, TallyStage};

use crate::core::error::ConstructionError;
use crate::quorum::QuorumGate;
use crate::reducer::Reducer;
use crate::source::SourceDescriptor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Engine-assigned identifier of one submitted round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{:06}", self.0)
    }
}

/// A validated, immutable oracle request.
///
/// Serializes through [`RequestDefinition`], so deserializing runs the same
/// validation as [`Request::builder`].
///
/// # Example
///
/// ```
/// use witness_domain::{Reducer, Request};
///
/// let request = Request::randomness();
/// assert_eq!(request.tally().stage().reducer, Reducer::ConcatenateAndHash);
///
/// let json = serde_json::to_string(&request).unwrap();
/// let back: Request = serde_json::from_str(&json).unwrap();
/// assert_eq!(back, request);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestDefinition", into = "RequestDefinition")]
pub struct Request {
    sources: Vec<SourceDescriptor>,
    aggregation: AggregationStage,
    tally: TallyStage,
    quorum: QuorumGate,
    economics: EconomicParameters,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// The canonical randomness request: one random source, `mode`
    /// aggregation, `concatenateAndHash` tally, quorum (8, 51), fees
    /// (10^8, 10^6) and collateral 10·10^9.
    pub fn randomness() -> Self {
        Self {
            sources: vec![SourceDescriptor::random()],
            aggregation: AggregationStage(Stage::new(Reducer::Mode)),
            tally: TallyStage(Stage::new(Reducer::ConcatenateAndHash)),
            quorum: QuorumGate::from_valid(8, 51),
            economics: EconomicParameters::from_amounts(100_000_000, 1_000_000, 10_000_000_000),
        }
    }

    /// Sources in declaration order.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn aggregation(&self) -> &AggregationStage {
        &self.aggregation
    }

    pub fn tally(&self) -> &TallyStage {
        &self.tally
    }

    pub fn quorum(&self) -> &QuorumGate {
        &self.quorum
    }

    pub fn economics(&self) -> &EconomicParameters {
        &self.economics
    }

    /// Plain-data form of this request.
    pub fn to_definition(&self) -> RequestDefinition {
        RequestDefinition::from(self.clone())
    }

    /// Lowercase hex SHA-256 of the request's JSON document.
    ///
    /// Struct fields serialize in declaration order, so equal requests always
    /// hash equally.
    pub fn content_hash(&self) -> String {
        let bytes = serde_json::to_vec(&self.to_definition()).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }
}

impl TryFrom<RequestDefinition> for Request {
    type Error = ConstructionError;

    fn try_from(def: RequestDefinition) -> Result<Self, Self::Error> {
        if def.sources.is_empty() {
            return Err(ConstructionError::NoSources);
        }
        for (index, source) in def.sources.iter().enumerate() {
            source
                .validate()
                .map_err(|reason| ConstructionError::InvalidSource { index, reason })?;
        }

        let aggregation = def
            .aggregation
            .ok_or(ConstructionError::MissingStage("aggregation"))?;
        let tally = def.tally.ok_or(ConstructionError::MissingStage("tally"))?;
        let quorum = def.quorum.ok_or(ConstructionError::MissingQuorum)?;

        aggregation.validate("aggregation")?;
        tally.validate("tally")?;

        Ok(Self {
            sources: def.sources,
            aggregation: AggregationStage(aggregation),
            tally: TallyStage(tally),
            quorum: QuorumGate::new(quorum.min_reports, quorum.min_agreement_percent)?,
            economics: EconomicParameters::new(
                def.economics.retrieval_fee,
                def.economics.aggregation_fee,
                def.economics.collateral,
            )?,
        })
    }
}

impl From<Request> for RequestDefinition {
    fn from(request: Request) -> Self {
        // Validated amounts came from i64, so they always fit back.
        let to_i64 = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);

        RequestDefinition {
            sources: request.sources,
            aggregation: Some(request.aggregation.0),
            tally: Some(request.tally.0),
            quorum: Some(QuorumDefinition {
                min_reports: request.quorum.min_reports(),
                min_agreement_percent: u16::from(request.quorum.min_agreement_percent()),
            }),
            economics: EconomicsDefinition {
                retrieval_fee: to_i64(request.economics.retrieval_fee()),
                aggregation_fee: to_i64(request.economics.aggregation_fee()),
                collateral: to_i64(request.economics.collateral()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::Filter;
    use crate::source::ValueKind;

    #[test]
    fn test_randomness_request_matches_builder() {
        let built = Request::builder()
            .add_source(SourceDescriptor::random())
            .aggregation(Stage::new(Reducer::Mode))
            .tally(Stage::new(Reducer::ConcatenateAndHash))
            .quorum(8, 51)
            .fees(100_000_000, 1_000_000)
            .collateral(10_000_000_000)
            .build()
            .unwrap();
        assert_eq!(built, Request::randomness());
    }

    #[test]
    fn test_zero_sources_is_construction_error() {
        let def = Request::randomness().to_definition();
        let def = RequestDefinition {
            sources: vec![],
            ..def
        };
        assert_eq!(Request::try_from(def), Err(ConstructionError::NoSources));
    }

    #[test]
    fn test_invalid_source_reports_index() {
        let def = RequestDefinition {
            sources: vec![
                SourceDescriptor::random(),
                SourceDescriptor::http_get("gopher://x", ValueKind::Bytes),
            ],
            ..Request::randomness().to_definition()
        };
        assert!(matches!(
            Request::try_from(def),
            Err(ConstructionError::InvalidSource { index: 1, .. })
        ));
    }

    #[test]
    fn test_out_of_range_percent() {
        let def = RequestDefinition {
            quorum: Some(QuorumDefinition {
                min_reports: 8,
                min_agreement_percent: 101,
            }),
            ..Request::randomness().to_definition()
        };
        assert_eq!(
            Request::try_from(def),
            Err(ConstructionError::InvalidAgreementPercent(101))
        );
    }

    #[test]
    fn test_json_round_trip_preserves_every_field() {
        let request = Request::builder()
            .add_source(SourceDescriptor::Random { size: 16 })
            .add_source(SourceDescriptor::http_get(
                "https://example.org/price",
                ValueKind::Float,
            ))
            .aggregation(
                Stage::new(Reducer::Mean).with_filter(Filter::DeviationStandard { sigmas: 1.5 }),
            )
            .tally(Stage::new(Reducer::Median).with_filter(Filter::Mode))
            .quorum(3, 66)
            .fees(5, 7)
            .collateral(11)
            .build()
            .unwrap();

        let json = serde_json::to_string(&request).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"sources": [], "aggregation": {"reducer": "mode"},
            "tally": {"reducer": "mode"}, "quorum": {"min_reports": 1, "min_agreement_percent": 51}}"#;
        let err = serde_json::from_str::<Request>(json).unwrap_err();
        assert!(err.to_string().contains("no sources"));
    }

    #[test]
    fn test_negative_collateral_in_document() {
        let json = r#"{"sources": [{"kind": "random"}], "aggregation": {"reducer": "mode"},
            "tally": {"reducer": "mode"}, "quorum": {"min_reports": 1, "min_agreement_percent": 51},
            "economics": {"collateral": -1}}"#;
        let err = serde_json::from_str::<Request>(json).unwrap_err();
        assert!(err.to_string().contains("collateral"));
    }

    #[test]
    fn test_content_hash_is_stable_and_distinguishing() {
        let a = Request::randomness();
        let b = Request::randomness();
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);

        let c = Request::builder()
            .add_source(SourceDescriptor::random())
            .aggregation(Stage::new(Reducer::Mode))
            .tally(Stage::new(Reducer::ConcatenateAndHash))
            .quorum(8, 52)
            .build()
            .unwrap();
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::new(42).to_string(), "req-000042");
    }
}
