//! Numeric helpers for `mean` and `median`.
//!
//! All-integer input is reduced exactly in i128 and rounded half up; any
//! float in the input switches the whole sequence to f64. Both paths sort
//! before summing so results do not depend on input order.

use crate::core::error::ReduceError;
use crate::core::value::Value;

pub(super) enum Numbers {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

impl Numbers {
    /// Classify `values`, failing on the first non-numeric element.
    pub(super) fn from_values(values: &[Value], reducer: &str) -> Result<Self, ReduceError> {
        let mut ints = Vec::with_capacity(values.len());
        let mut floats = Vec::with_capacity(values.len());
        let mut all_integers = true;

        for value in values {
            match value {
                Value::Integer(i) => {
                    ints.push(*i);
                    floats.push(*i as f64);
                }
                Value::Float(f) => {
                    all_integers = false;
                    floats.push(*f);
                }
                other => {
                    return Err(ReduceError::TypeMismatch {
                        reducer: reducer.to_string(),
                        found: other.type_name().to_string(),
                    });
                }
            }
        }

        if all_integers {
            ints.sort_unstable();
            Ok(Numbers::Integers(ints))
        } else {
            floats.sort_by(f64::total_cmp);
            Ok(Numbers::Floats(floats))
        }
    }

    pub(super) fn mean(&self) -> Option<Value> {
        match self {
            Numbers::Integers(ints) if !ints.is_empty() => {
                let sum: i128 = ints.iter().map(|&i| i128::from(i)).sum();
                Some(Value::Integer(div_round_half_up(sum, ints.len() as i128)))
            }
            Numbers::Floats(floats) if !floats.is_empty() => {
                Some(Value::Float(sorted_mean(floats)))
            }
            _ => None,
        }
    }

    pub(super) fn median(&self) -> Option<Value> {
        match self {
            Numbers::Integers(ints) if !ints.is_empty() => {
                let mid = ints.len() / 2;
                if ints.len() % 2 == 1 {
                    Some(Value::Integer(ints[mid]))
                } else {
                    let pair = i128::from(ints[mid - 1]) + i128::from(ints[mid]);
                    Some(Value::Integer(div_round_half_up(pair, 2)))
                }
            }
            Numbers::Floats(floats) if !floats.is_empty() => {
                let mid = floats.len() / 2;
                if floats.len() % 2 == 1 {
                    Some(Value::Float(floats[mid]))
                } else {
                    Some(Value::Float((floats[mid - 1] + floats[mid]) / 2.0))
                }
            }
            _ => None,
        }
    }
}

/// Mean of an already sorted slice.
pub(super) fn sorted_mean(sorted: &[f64]) -> f64 {
    sorted.iter().sum::<f64>() / sorted.len() as f64
}

fn div_round_half_up(numerator: i128, denominator: i128) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    let rounded = if remainder * 2 >= denominator {
        quotient + 1
    } else {
        quotient
    };
    // The mean of i64 values always lies within i64 range.
    rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
