//! Quorum gate domain
//!
//! After the tally stage has produced a value, the quorum gate decides
//! whether enough nodes took part and agreed for it to be accepted.
//!
//! ```text
//! reports received ──► enough reports? ──no──► Reject(InsufficientReports)
//!                            │yes
//!                      tally succeeded? ──no──► Reject(TallyFailed)
//!                            │yes
//!                   agreement ≥ percent? ──no──► Reject(InsufficientAgreement)
//!                            │yes
//!                      Accept(value, agreement)
//! ```
//!
//! Agreement is delegated to the tally reducer: for `mode` it is the share of
//! reports equal to the winner; for `concatenateAndHash` it is structurally
//! 100%.

pub mod agreement;
pub mod gate;

pub use agreement::Agreement;
pub use gate::{GateDecision, QuorumGate, RejectionReason};
