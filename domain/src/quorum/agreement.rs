//! Agreement among reports

use crate::reducer::Support;
use serde::{Deserialize, Serialize};

/// How many of the received reports agree with a tally result.
///
/// Thresholds are compared in integers (`agreeing * 100 >= percent * out_of`)
/// so a 51% gate over 8 reports needs exactly 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub agreeing: usize,
    pub out_of: usize,
}

impl Agreement {
    pub fn new(agreeing: usize, out_of: usize) -> Self {
        Self { agreeing, out_of }
    }

    /// Agreement implied by a reducer's support over `received` reports.
    ///
    /// Structural support (hash commitments) counts every report as agreeing.
    pub fn from_support(support: Support, received: usize) -> Self {
        match support {
            Support::Votes(agreeing) => Self::new(agreeing, received),
            Support::Structural => Self::new(received, received),
        }
    }

    /// Agreement in `[0.0, 1.0]`; zero when nothing was received.
    pub fn fraction(&self) -> f64 {
        if self.out_of == 0 {
            0.0
        } else {
            self.agreeing as f64 / self.out_of as f64
        }
    }

    pub fn meets(&self, percent: u8) -> bool {
        self.out_of > 0 && self.agreeing * 100 >= usize::from(percent) * self.out_of
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({:.1}%)",
            self.agreeing,
            self.out_of,
            self.fraction() * 100.0
        )
    }
}
