//! Quorum gate
//!
//! Decides whether a tally result is accepted. The gate runs after the tally
//! stage and never short-circuits retrieval.

use super::agreement::Agreement;
use crate::core::error::{ConstructionError, TallyError};
use crate::core::value::Value;
use crate::resolution::tally::TallyOutput;
use serde::{Deserialize, Serialize};

/// Minimum participation and agreement thresholds.
///
/// # Example
///
/// ```
/// use witness_domain::QuorumGate;
///
/// let gate = QuorumGate::new(8, 51).unwrap();
/// assert!(gate.is_satisfied(5, 8));  // 5/8 = 62.5%
/// assert!(!gate.is_satisfied(4, 8)); // 4/8 = 50%
/// assert!(!gate.is_satisfied(7, 7)); // only 7 reports
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuorumGate {
    min_reports: u32,
    min_agreement_percent: u8,
}

impl QuorumGate {
    /// Validate and build a gate.
    pub fn new(min_reports: u32, min_agreement_percent: u16) -> Result<Self, ConstructionError> {
        if min_reports == 0 {
            return Err(ConstructionError::InvalidMinReports);
        }
        let min_agreement_percent = u8::try_from(min_agreement_percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(ConstructionError::InvalidAgreementPercent(
                min_agreement_percent,
            ))?;

        Ok(Self {
            min_reports,
            min_agreement_percent,
        })
    }

    /// Build from thresholds already known to be valid.
    pub(crate) const fn from_valid(min_reports: u32, min_agreement_percent: u8) -> Self {
        Self {
            min_reports,
            min_agreement_percent,
        }
    }

    pub fn min_reports(&self) -> u32 {
        self.min_reports
    }

    pub fn min_agreement_percent(&self) -> u8 {
        self.min_agreement_percent
    }

    /// Whether `received` reports are enough to be considered at all.
    pub fn has_enough_reports(&self, received: usize) -> bool {
        received >= self.min_reports as usize
    }

    /// Check both thresholds given an agreeing count out of `received` reports.
    pub fn is_satisfied(&self, agreeing: usize, received: usize) -> bool {
        self.has_enough_reports(received)
            && Agreement::new(agreeing, received).meets(self.min_agreement_percent)
    }

    /// Minimum agreeing reports needed out of `received`.
    pub fn min_agreeing_needed(&self, received: usize) -> usize {
        (received * self.min_agreement_percent as usize).div_ceil(100)
    }

    /// Decide on a completed tally.
    ///
    /// Checks run in a fixed order: report count, then tally failure, then
    /// agreement.
    pub fn evaluate(
        &self,
        received: usize,
        tally: &Result<TallyOutput, TallyError>,
    ) -> GateDecision {
        if !self.has_enough_reports(received) {
            return GateDecision::Reject {
                reason: RejectionReason::InsufficientReports {
                    received,
                    required: self.min_reports as usize,
                },
            };
        }

        let output = match tally {
            Ok(output) => output,
            Err(cause) => {
                return GateDecision::Reject {
                    reason: RejectionReason::TallyFailed {
                        cause: cause.clone(),
                    },
                };
            }
        };

        if !output.agreement.meets(self.min_agreement_percent) {
            return GateDecision::Reject {
                reason: RejectionReason::InsufficientAgreement {
                    agreement: output.agreement,
                    required_percent: self.min_agreement_percent,
                },
            };
        }

        GateDecision::Accept {
            value: output.value.clone(),
            agreement: output.agreement,
        }
    }

    pub fn description(&self) -> String {
        format!(
            "at least {} reports with {}% agreement",
            self.min_reports, self.min_agreement_percent
        )
    }
}

impl std::fmt::Display for QuorumGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Outcome of the quorum gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Accept { value: Value, agreement: Agreement },
    Reject { reason: RejectionReason },
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accept { .. })
    }
}

/// Why a round was rejected. A user-visible outcome, not a system fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    InsufficientReports {
        received: usize,
        required: usize,
    },
    InsufficientAgreement {
        agreement: Agreement,
        required_percent: u8,
    },
    TallyFailed {
        cause: TallyError,
    },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::InsufficientReports { received, required } => {
                write!(f, "insufficient reports ({} of {} required)", received, required)
            }
            RejectionReason::InsufficientAgreement {
                agreement,
                required_percent,
            } => write!(
                f,
                "insufficient agreement ({} below {}%)",
                agreement, required_percent
            ),
            RejectionReason::TallyFailed { cause } => write!(f, "tally failed: {}", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeId;

    fn output(agreeing: usize, received: usize) -> Result<TallyOutput, TallyError> {
        Ok(TallyOutput {
            value: Value::Integer(7),
            agreement: Agreement::new(agreeing, received),
            tallied: vec![NodeId::from("a")],
        })
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(QuorumGate::new(0, 51), Err(ConstructionError::InvalidMinReports));
        assert_eq!(
            QuorumGate::new(8, 101),
            Err(ConstructionError::InvalidAgreementPercent(101))
        );
        assert_eq!(
            QuorumGate::new(8, 300),
            Err(ConstructionError::InvalidAgreementPercent(300))
        );
        assert!(QuorumGate::new(1, 0).is_ok());
        assert!(QuorumGate::new(1, 100).is_ok());
    }

    #[test]
    fn test_accept() {
        let gate = QuorumGate::new(8, 51).unwrap();
        let decision = gate.evaluate(8, &output(5, 8));
        assert_eq!(
            decision,
            GateDecision::Accept {
                value: Value::Integer(7),
                agreement: Agreement::new(5, 8)
            }
        );
    }

    #[test]
    fn test_flipping_report_count_rejects() {
        let gate = QuorumGate::new(8, 51).unwrap();
        assert!(gate.evaluate(8, &output(8, 8)).is_accepted());

        let decision = gate.evaluate(7, &output(7, 7));
        assert_eq!(
            decision,
            GateDecision::Reject {
                reason: RejectionReason::InsufficientReports {
                    received: 7,
                    required: 8
                }
            }
        );
    }

    #[test]
    fn test_flipping_agreement_rejects() {
        let gate = QuorumGate::new(4, 75).unwrap();
        assert!(gate.evaluate(4, &output(3, 4)).is_accepted());

        let decision = gate.evaluate(4, &output(2, 4));
        assert!(matches!(
            decision,
            GateDecision::Reject {
                reason: RejectionReason::InsufficientAgreement {
                    required_percent: 75,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_agreement_threshold_is_inclusive() {
        let gate = QuorumGate::new(1, 50).unwrap();
        assert!(gate.evaluate(4, &output(2, 4)).is_accepted());
    }

    #[test]
    fn test_report_count_checked_before_tally_error() {
        let gate = QuorumGate::new(3, 51).unwrap();
        let tally = Err(TallyError::NoSuccessfulReports { received: 2 });
        assert!(matches!(
            gate.evaluate(2, &tally),
            GateDecision::Reject {
                reason: RejectionReason::InsufficientReports { .. }
            }
        ));

        let tally = Err(TallyError::NoSuccessfulReports { received: 3 });
        assert!(matches!(
            gate.evaluate(3, &tally),
            GateDecision::Reject {
                reason: RejectionReason::TallyFailed { .. }
            }
        ));
    }

    #[test]
    fn test_min_agreeing_needed() {
        let gate = QuorumGate::new(8, 51).unwrap();
        assert_eq!(gate.min_agreeing_needed(8), 5); // ceil(4.08)
        assert_eq!(gate.min_agreeing_needed(10), 6); // ceil(5.1)
        let gate = QuorumGate::new(1, 75).unwrap();
        assert_eq!(gate.min_agreeing_needed(4), 3);
    }

    #[test]
    fn test_display() {
        let gate = QuorumGate::new(8, 51).unwrap();
        assert_eq!(gate.to_string(), "at least 8 reports with 51% agreement");
    }
}
