//! Filters applied before reduction
//!
//! Filters never fail. They may remove elements, never reorder the ones they
//! keep, and an empty result is passed on to the reducer as-is.

use super::numeric::sorted_mean;
use super::strategy::mode_of;
use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// A filter over an ordered sequence of values.
///
/// No filtering at all is expressed as an empty filter list.
///
/// # Example
///
/// ```
/// use witness_domain::{Filter, Value};
///
/// let values: Vec<Value> = [10, 11, 9, 10, 500].iter().map(|&x| Value::Integer(x)).collect();
/// let kept = Filter::DeviationStandard { sigmas: 1.5 }.apply(values);
/// assert_eq!(kept.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Drop numeric values further than `sigmas` population standard
    /// deviations from the mean.
    DeviationStandard { sigmas: f64 },
    /// Keep only the values equal to the mode (mode-exclusion).
    Mode,
}

impl Filter {
    pub fn apply(&self, values: Vec<Value>) -> Vec<Value> {
        match self {
            Filter::DeviationStandard { sigmas } => deviation_standard(values, *sigmas),
            Filter::Mode => mode_exclusion(values),
        }
    }

    /// Apply `filters` left to right.
    pub fn apply_all(filters: &[Filter], values: Vec<Value>) -> Vec<Value> {
        filters
            .iter()
            .fold(values, |acc, filter| filter.apply(acc))
    }

    /// Check the filter's parameter, returning a reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Filter::DeviationStandard { sigmas } if !sigmas.is_finite() || *sigmas < 0.0 => Err(
                format!("sigmas must be finite and non-negative, got {}", sigmas),
            ),
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::DeviationStandard { .. } => "deviation_standard",
            Filter::Mode => "mode",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::DeviationStandard { sigmas } => write!(f, "deviation_standard({})", sigmas),
            Filter::Mode => f.write_str("mode"),
        }
    }
}

fn deviation_standard(mut values: Vec<Value>, sigmas: f64) -> Vec<Value> {
    let numbers: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
    let Some(mut sorted) = numbers else {
        return values;
    };
    if sorted.is_empty() {
        return values;
    }

    sorted.sort_by(f64::total_cmp);
    let mean = sorted_mean(&sorted);
    let mut squared: Vec<f64> = sorted.iter().map(|x| (x - mean).powi(2)).collect();
    squared.sort_by(f64::total_cmp);
    let std_dev = sorted_mean(&squared).sqrt();

    if !std_dev.is_finite() || std_dev == 0.0 {
        return values;
    }

    let limit = sigmas * std_dev;
    values.retain(|v| v.as_f64().is_some_and(|x| (x - mean).abs() <= limit));
    values
}

fn mode_exclusion(values: Vec<Value>) -> Vec<Value> {
    let Some((index, _)) = mode_of(&values) else {
        return values;
    };
    let winner = values[index].clone();
    values.into_iter().filter(|v| *v == winner).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(xs: &[i64]) -> Vec<Value> {
        xs.iter().map(|&x| Value::Integer(x)).collect()
    }

    #[test]
    fn test_empty_filter_list_is_identity() {
        let values = ints(&[3, 1, 2]);
        assert_eq!(Filter::apply_all(&[], values.clone()), values);
    }

    #[test]
    fn test_deviation_drops_outliers_and_keeps_order() {
        let kept = Filter::DeviationStandard { sigmas: 1.0 }.apply(ints(&[10, 12, 100, 11, 9]));
        assert_eq!(kept, ints(&[10, 12, 11, 9]));
    }

    #[test]
    fn test_deviation_identity_on_non_numeric() {
        let values = vec![Value::Integer(1), Value::Bytes(vec![1])];
        let kept = Filter::DeviationStandard { sigmas: 0.0 }.apply(values.clone());
        assert_eq!(kept, values);
    }

    #[test]
    fn test_deviation_identity_on_zero_spread() {
        let values = ints(&[4, 4, 4]);
        let kept = Filter::DeviationStandard { sigmas: 0.0 }.apply(values.clone());
        assert_eq!(kept, values);
    }

    #[test]
    fn test_deviation_can_empty_the_sequence() {
        // Two points symmetric around the mean both sit exactly one sd away.
        let kept = Filter::DeviationStandard { sigmas: 0.5 }.apply(ints(&[0, 10]));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_mode_exclusion() {
        let kept = Filter::Mode.apply(ints(&[1, 2, 2, 3, 2]));
        assert_eq!(kept, ints(&[2, 2, 2]));
    }

    #[test]
    fn test_mode_exclusion_on_empty() {
        assert!(Filter::Mode.apply(Vec::new()).is_empty());
    }

    #[test]
    fn test_filters_chain_left_to_right() {
        let filters = vec![Filter::DeviationStandard { sigmas: 1.0 }, Filter::Mode];
        let kept = Filter::apply_all(&filters, ints(&[5, 5, 6, 1000, 6, 5]));
        assert_eq!(kept, ints(&[5, 5, 5]));
    }

    #[test]
    fn test_validate() {
        assert!(Filter::DeviationStandard { sigmas: -1.0 }.validate().is_err());
        assert!(
            Filter::DeviationStandard { sigmas: f64::NAN }
                .validate()
                .is_err()
        );
        assert!(Filter::DeviationStandard { sigmas: 2.0 }.validate().is_ok());
        assert!(Filter::Mode.validate().is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Filter::DeviationStandard { sigmas: 1.5 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "deviation_standard", "sigmas": 1.5})
        );
        let f: Filter = serde_json::from_str(r#"{"kind":"mode"}"#).unwrap();
        assert_eq!(f, Filter::Mode);
    }
}
