//! Economic parameters of a request.
//!
//! Pure accounting data. The engine validates it and carries it along; it
//! never influences retrieval, reduction or the quorum gate.

use crate::core::error::ConstructionError;
use serde::Serialize;

/// Fees and collateral, all in the same smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct EconomicParameters {
    retrieval_fee: u64,
    aggregation_fee: u64,
    collateral: u64,
}

impl EconomicParameters {
    /// Validate and build. Negative amounts are rejected.
    pub fn new(
        retrieval_fee: i64,
        aggregation_fee: i64,
        collateral: i64,
    ) -> Result<Self, ConstructionError> {
        Ok(Self {
            retrieval_fee: non_negative("retrieval_fee", retrieval_fee)?,
            aggregation_fee: non_negative("aggregation_fee", aggregation_fee)?,
            collateral: non_negative("collateral", collateral)?,
        })
    }

    /// Build from amounts that are non-negative by construction.
    pub(crate) const fn from_amounts(retrieval_fee: u64, aggregation_fee: u64, collateral: u64) -> Self {
        Self {
            retrieval_fee,
            aggregation_fee,
            collateral,
        }
    }

    /// Reward paid to each witness for retrieval.
    pub fn retrieval_fee(&self) -> u64 {
        self.retrieval_fee
    }

    /// Fee paid per aggregation transaction (commit and reveal each pay it).
    pub fn aggregation_fee(&self) -> u64 {
        self.aggregation_fee
    }

    /// Stake each witness puts at risk.
    pub fn collateral(&self) -> u64 {
        self.collateral
    }

    /// Collateral locked across `witnesses` nodes, `None` on overflow.
    pub fn total_collateral(&self, witnesses: u32) -> Option<u64> {
        self.collateral.checked_mul(u64::from(witnesses))
    }

    /// Total fee for `witnesses` nodes, `None` on overflow.
    ///
    /// Each witness earns the retrieval fee and pays the aggregation fee
    /// twice (commit and reveal).
    pub fn total_fee(&self, witnesses: u32) -> Option<u64> {
        let per_witness = self
            .aggregation_fee
            .checked_mul(2)?
            .checked_add(self.retrieval_fee)?;
        per_witness.checked_mul(u64::from(witnesses))
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u64, ConstructionError> {
    u64::try_from(value).map_err(|_| ConstructionError::NegativeEconomicParameter { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_values() {
        assert_eq!(
            EconomicParameters::new(1, -5, 0),
            Err(ConstructionError::NegativeEconomicParameter {
                field: "aggregation_fee",
                value: -5
            })
        );
        assert!(EconomicParameters::new(0, 0, -1).is_err());
    }

    #[test]
    fn test_totals() {
        let econ = EconomicParameters::new(1_000_000, 1_000, 1_000_000_000).unwrap();
        assert_eq!(econ.total_collateral(8), Some(8_000_000_000));
        assert_eq!(econ.total_fee(8), Some(8 * (2 * 1_000 + 1_000_000)));
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let econ = EconomicParameters::new(i64::MAX, i64::MAX, i64::MAX).unwrap();
        assert_eq!(econ.total_fee(1), None);
        assert_eq!(econ.total_collateral(3), None);
    }
}
