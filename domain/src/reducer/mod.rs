//! Reducers and filters
//!
//! A [`Reducer`] maps an ordered sequence of values to one value; a
//! [`Filter`] shrinks a sequence before reduction. Both are closed sets of
//! strategies and both are pure: identical input in identical order always
//! yields the identical output.
//!
//! # Order sensitivity
//!
//! ```text
//! mean / median        permutation-invariant
//! mode                 tie → value whose first occurrence comes first
//! concatenateAndHash   digest over values in input order
//! ```

pub mod filter;
mod numeric;
pub mod strategy;

pub use filter::Filter;
pub use strategy::Reducer;

use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// How many of the reduced values back the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Support {
    /// This many input values agree with the result.
    Votes(usize),
    /// The result is a deterministic commitment over every input, so
    /// agreement by value does not apply.
    Structural,
}

/// Output of a successful reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    pub value: Value,
    pub support: Support,
}

impl Reduction {
    pub fn new(value: Value, support: Support) -> Self {
        Self { value, support }
    }
}
