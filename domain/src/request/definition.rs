//! Request definition documents
//!
//! The plain-data form of a request as it is written to and read from JSON or
//! TOML. A definition is unchecked; converting it into a
//! [`Request`](super::Request) validates it.
//!
//! ```json
//! {
//!   "sources": [{ "kind": "random" }],
//!   "aggregation": { "reducer": "mode", "filters": [] },
//!   "tally": { "reducer": "concatenateAndHash", "filters": [] },
//!   "quorum": { "min_reports": 8, "min_agreement_percent": 51 },
//!   "economics": { "retrieval_fee": 100000000, "aggregation_fee": 1000000, "collateral": 10000000000 }
//! }
//! ```

use super::stage::Stage;
use crate::source::SourceDescriptor;
use serde::{Deserialize, Serialize};

/// Unvalidated request document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDefinition {
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tally: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quorum: Option<QuorumDefinition>,
    #[serde(default)]
    pub economics: EconomicsDefinition,
}

/// Quorum thresholds as written in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuorumDefinition {
    pub min_reports: u32,
    pub min_agreement_percent: u16,
}

/// Economic parameters as written in a document.
///
/// Signed so that a negative amount reaches validation and is reported as a
/// construction error rather than a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsDefinition {
    pub retrieval_fee: i64,
    pub aggregation_fee: i64,
    pub collateral: i64,
}
