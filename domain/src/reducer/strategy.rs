//! Reduction strategies

use super::numeric::Numbers;
use super::{Reduction, Support};
use crate::core::error::ReduceError;
use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Strategy for reducing an ordered sequence of values to one value.
///
/// # Example
///
/// ```
/// use witness_domain::{Reducer, Value};
///
/// let values = vec![Value::Integer(3), Value::Integer(7), Value::Integer(3)];
/// let reduction = Reducer::Mode.reduce(&values).unwrap();
/// assert_eq!(reduction.value, Value::Integer(3));
///
/// assert!(Reducer::Mean.reduce(&[]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reducer {
    /// Most frequent value; ties go to the value seen first.
    Mode,
    /// Arithmetic mean of numeric values.
    Mean,
    /// Median of numeric values.
    Median,
    /// SHA-256 over the concatenated stable encodings, in input order.
    ConcatenateAndHash,
}

impl Reducer {
    /// Reduce `values` to one value.
    ///
    /// Every strategy fails with [`ReduceError::EmptyInput`] on an empty
    /// sequence.
    pub fn reduce(&self, values: &[Value]) -> Result<Reduction, ReduceError> {
        if values.is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        match self {
            Reducer::Mode => {
                let (index, count) = mode_of(values).ok_or(ReduceError::EmptyInput)?;
                Ok(Reduction::new(values[index].clone(), Support::Votes(count)))
            }
            Reducer::Mean => {
                let value = Numbers::from_values(values, self.name())?
                    .mean()
                    .ok_or(ReduceError::EmptyInput)?;
                Ok(Reduction::new(value, Support::Votes(values.len())))
            }
            Reducer::Median => {
                let value = Numbers::from_values(values, self.name())?
                    .median()
                    .ok_or(ReduceError::EmptyInput)?;
                Ok(Reduction::new(value, Support::Votes(values.len())))
            }
            Reducer::ConcatenateAndHash => Ok(Reduction::new(
                concatenate_and_hash(values),
                Support::Structural,
            )),
        }
    }

    /// Name as written in request definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Mode => "mode",
            Reducer::Mean => "mean",
            Reducer::Median => "median",
            Reducer::ConcatenateAndHash => "concatenateAndHash",
        }
    }
}

impl std::fmt::Display for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "mode" => Ok(Reducer::Mode),
            "mean" | "average" => Ok(Reducer::Mean),
            "median" => Ok(Reducer::Median),
            "concatenateandhash" | "hash" => Ok(Reducer::ConcatenateAndHash),
            _ => Err(format!(
                "Unknown reducer: {}. Valid: mode, mean, median, concatenateAndHash",
                s
            )),
        }
    }
}

/// Index of the mode's first occurrence and its number of occurrences.
///
/// Candidates are visited in first-occurrence order and only a strictly
/// higher count replaces the current best, so ties resolve to the lowest
/// first index.
pub(crate) fn mode_of(values: &[Value]) -> Option<(usize, usize)> {
    let mut tallies: Vec<(usize, usize)> = Vec::new();

    for (i, value) in values.iter().enumerate() {
        match tallies.iter_mut().find(|(first, _)| values[*first] == *value) {
            Some((_, count)) => *count += 1,
            None => tallies.push((i, 1)),
        }
    }

    tallies.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.1 >= candidate.1 => Some(current),
        _ => Some(candidate),
    })
}

fn concatenate_and_hash(values: &[Value]) -> Value {
    let mut buf = Vec::new();
    for value in values {
        value.encode_into(&mut buf);
    }
    Value::Bytes(Sha256::digest(&buf).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ints(xs: &[i64]) -> Vec<Value> {
        xs.iter().map(|&x| Value::Integer(x)).collect()
    }

    #[test]
    fn test_empty_input_fails_for_every_strategy() {
        for reducer in [
            Reducer::Mode,
            Reducer::Mean,
            Reducer::Median,
            Reducer::ConcatenateAndHash,
        ] {
            assert_eq!(reducer.reduce(&[]), Err(ReduceError::EmptyInput));
        }
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let r = Reducer::Mode.reduce(&ints(&[1, 2, 2, 3, 2, 1])).unwrap();
        assert_eq!(r.value, Value::Integer(2));
        assert_eq!(r.support, Support::Votes(3));
    }

    #[test]
    fn test_mode_tie_goes_to_first_occurrence() {
        let r = Reducer::Mode.reduce(&ints(&[5, 9, 9, 5])).unwrap();
        assert_eq!(r.value, Value::Integer(5));

        // Same multiset, different order, different winner
        let r = Reducer::Mode.reduce(&ints(&[9, 5, 5, 9])).unwrap();
        assert_eq!(r.value, Value::Integer(9));
    }

    #[test]
    fn test_mode_works_on_non_numeric_values() {
        let values = vec![
            Value::Bytes(vec![1]),
            Value::Bytes(vec![2]),
            Value::Bytes(vec![2]),
        ];
        let r = Reducer::Mode.reduce(&values).unwrap();
        assert_eq!(r.value, Value::Bytes(vec![2]));
        assert_eq!(r.support, Support::Votes(2));
    }

    #[test]
    fn test_mean_integers_rounds_half_up() {
        let r = Reducer::Mean.reduce(&ints(&[1, 2])).unwrap();
        assert_eq!(r.value, Value::Integer(2));
        assert_eq!(r.support, Support::Votes(2));

        let r = Reducer::Mean.reduce(&ints(&[1, 2, 3, 10])).unwrap();
        assert_eq!(r.value, Value::Integer(4));
    }

    #[test]
    fn test_mean_floats() {
        let values = vec![Value::Float(1.0), Value::Float(2.0), Value::Integer(3)];
        let r = Reducer::Mean.reduce(&values).unwrap();
        assert_eq!(r.value, Value::Float(2.0));
    }

    #[test]
    fn test_median_odd_and_even() {
        let r = Reducer::Median.reduce(&ints(&[9, 1, 5])).unwrap();
        assert_eq!(r.value, Value::Integer(5));

        let r = Reducer::Median.reduce(&ints(&[4, 1, 3, 2])).unwrap();
        assert_eq!(r.value, Value::Integer(3)); // (2 + 3) / 2 rounded half up

        let values = vec![Value::Float(4.0), Value::Float(1.0)];
        let r = Reducer::Median.reduce(&values).unwrap();
        assert_eq!(r.value, Value::Float(2.5));
    }

    #[test]
    fn test_numeric_reducers_reject_non_numeric() {
        let values = vec![Value::Integer(1), Value::String("x".to_string())];
        assert!(matches!(
            Reducer::Mean.reduce(&values),
            Err(ReduceError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Reducer::Median.reduce(&values),
            Err(ReduceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_concatenate_and_hash_is_fixed_width_and_structural() {
        let values = vec![Value::Bytes(vec![1; 32]), Value::Bytes(vec![2; 32])];
        let r = Reducer::ConcatenateAndHash.reduce(&values).unwrap();
        match &r.value {
            Value::Bytes(digest) => assert_eq!(digest.len(), 32),
            other => panic!("expected bytes, got {:?}", other),
        }
        assert_eq!(r.support, Support::Structural);
    }

    #[test]
    fn test_concatenate_and_hash_matches_manual_digest() {
        let values = vec![Value::Integer(1), Value::String("a".to_string())];
        let mut buf = Value::Integer(1).encode();
        buf.extend(Value::String("a".to_string()).encode());
        let expected = Value::Bytes(Sha256::digest(&buf).to_vec());

        let r = Reducer::ConcatenateAndHash.reduce(&values).unwrap();
        assert_eq!(r.value, expected);
    }

    #[test]
    fn test_concatenate_and_hash_is_order_sensitive() {
        let a = vec![Value::Integer(1), Value::Integer(2)];
        let b = vec![Value::Integer(2), Value::Integer(1)];
        let ha = Reducer::ConcatenateAndHash.reduce(&a).unwrap();
        let hb = Reducer::ConcatenateAndHash.reduce(&b).unwrap();
        assert_ne!(ha.value, hb.value);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Reducer::ConcatenateAndHash).unwrap(),
            "\"concatenateAndHash\""
        );
        let r: Reducer = serde_json::from_str("\"mode\"").unwrap();
        assert_eq!(r, Reducer::Mode);
    }

    #[test]
    fn test_parse_reducer() {
        assert_eq!("mode".parse::<Reducer>().ok(), Some(Reducer::Mode));
        assert_eq!(
            "concatenateAndHash".parse::<Reducer>().ok(),
            Some(Reducer::ConcatenateAndHash)
        );
        assert_eq!(
            "concatenate_and_hash".parse::<Reducer>().ok(),
            Some(Reducer::ConcatenateAndHash)
        );
        assert!("sum".parse::<Reducer>().is_err());
    }

    fn shuffled_ints() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
        prop::collection::vec(-1_000_000_000i64..1_000_000_000, 1..24)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    }

    fn shuffled_floats() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        prop::collection::vec(-1.0e6f64..1.0e6, 1..24)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    }

    proptest! {
        #[test]
        fn prop_mean_median_ignore_integer_order((original, shuffled) in shuffled_ints()) {
            let a = ints(&original);
            let b = ints(&shuffled);
            prop_assert_eq!(Reducer::Mean.reduce(&a).unwrap(), Reducer::Mean.reduce(&b).unwrap());
            prop_assert_eq!(Reducer::Median.reduce(&a).unwrap(), Reducer::Median.reduce(&b).unwrap());
        }

        #[test]
        fn prop_mean_median_ignore_float_order((original, shuffled) in shuffled_floats()) {
            let a: Vec<Value> = original.into_iter().map(Value::Float).collect();
            let b: Vec<Value> = shuffled.into_iter().map(Value::Float).collect();
            prop_assert_eq!(Reducer::Mean.reduce(&a).unwrap(), Reducer::Mean.reduce(&b).unwrap());
            prop_assert_eq!(Reducer::Median.reduce(&a).unwrap(), Reducer::Median.reduce(&b).unwrap());
        }
    }
}
