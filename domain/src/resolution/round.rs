//! Round lifecycle

use serde::{Deserialize, Serialize};

/// State of one resolution round.
///
/// ```text
/// Pending → Retrieving → Aggregating → Collecting → Tallying → Gating → Resolved
///    └──────────┴────────────┴────────────┴──────────────────────────────→ Cancelled
/// ```
///
/// Forward jumps are allowed (a round whose witnesses all fail fast may go
/// from Retrieving straight to Tallying); going backwards is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// Submitted, not yet started
    Pending,
    /// Witness nodes are fetching their sources
    Retrieving,
    /// At least one witness is reducing its retrievals
    Aggregating,
    /// The barrier is gathering reports
    Collecting,
    Tallying,
    Gating,
    Resolved,
    Cancelled,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Pending => "pending",
            RoundState::Retrieving => "retrieving",
            RoundState::Aggregating => "aggregating",
            RoundState::Collecting => "collecting",
            RoundState::Tallying => "tallying",
            RoundState::Gating => "gating",
            RoundState::Resolved => "resolved",
            RoundState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundState::Resolved | RoundState::Cancelled)
    }

    fn rank(&self) -> u8 {
        match self {
            RoundState::Pending => 0,
            RoundState::Retrieving => 1,
            RoundState::Aggregating => 2,
            RoundState::Collecting => 3,
            RoundState::Tallying => 4,
            RoundState::Gating => 5,
            RoundState::Resolved | RoundState::Cancelled => 6,
        }
    }

    /// Whether a round in this state may move to `next`.
    pub fn can_advance_to(&self, next: RoundState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == RoundState::Cancelled || next.rank() > self.rank()
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the collection barrier closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierClose {
    /// Every expected witness reported.
    AllReported,
    /// The grace period after reaching the minimum report count elapsed.
    GraceElapsed,
    /// The collection window elapsed.
    WindowElapsed,
    /// Every witness task ended, some without reporting.
    WitnessesExhausted,
}

impl BarrierClose {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarrierClose::AllReported => "all_reported",
            BarrierClose::GraceElapsed => "grace_elapsed",
            BarrierClose::WindowElapsed => "window_elapsed",
            BarrierClose::WitnessesExhausted => "witnesses_exhausted",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BarrierClose::AllReported => "all witnesses reported",
            BarrierClose::GraceElapsed => "grace period elapsed after quorum of reports",
            BarrierClose::WindowElapsed => "collection window elapsed",
            BarrierClose::WitnessesExhausted => "no witness left to report",
        }
    }
}

impl std::fmt::Display for BarrierClose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
