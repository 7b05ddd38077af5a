//! Domain layer for witness-quorum
//!
//! This crate contains the pure logic of request resolution: values, sources,
//! reducers, stages, the quorum gate and the request model. It has no
//! dependencies on async runtimes, I/O or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Request
//!
//! A [`Request`] names one or more sources, how each witness node reduces its
//! own retrievals (aggregation), how the nodes' reports are reduced into one
//! result (tally), and the quorum that result must meet.
//!
//! ## Round
//!
//! ```text
//! sources ──fetch──► AggregationStage (per node) ──► Report
//!                                                      │
//!                          collected reports ◄─────────┘
//!                                  │
//!                 TallyStage ──► QuorumGate ──► ResolutionResult
//! ```

pub mod config;
pub mod core;
pub mod quorum;
pub mod reducer;
pub mod request;
pub mod resolution;
pub mod source;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::{AggregationError, ConstructionError, FetchError, ReduceError, TallyError},
    node::NodeId,
    value::Value,
};
pub use quorum::{Agreement, GateDecision, QuorumGate, RejectionReason};
pub use reducer::{Filter, Reducer, Reduction, Support};
pub use request::{
    AggregationStage, EconomicParameters, Request, RequestBuilder, RequestDefinition, RequestId,
    Stage, TallyStage,
};
pub use resolution::{
    BarrierClose, Report, ReportOutcome, ResolutionResult, RoundState, TallyOutput,
};
pub use source::{SourceDescriptor, ValueKind};
