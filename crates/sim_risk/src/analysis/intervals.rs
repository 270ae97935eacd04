//! Empirical confidence intervals.
//!
//! The two-sided percentile method: the interval at level `c` runs from the
//! `(1 - c) / 2` quantile to the `1 - (1 - c) / 2` quantile of the sample.
//! Chosen over the normal approximation because it stays valid for skewed
//! marginals (beta, lognormal).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sim_engine::SampleSet;

use super::{empirical_quantile, sorted_copy};

/// A two-sided empirical confidence interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower interval bound.
    pub lower: f64,
    /// Upper interval bound.
    pub upper: f64,
    /// The confidence level the interval was computed at.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Returns whether the interval contains `value`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Returns the interval width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Computes the two-sided percentile interval of one column of draws.
///
/// # Arguments
/// * `values` - Non-empty sample column
/// * `confidence_level` - Level in (0, 1); the facade validates bounds
///
/// # Panics
/// Panics if `values` is empty.
pub fn percentile_interval(values: &[f64], confidence_level: f64) -> ConfidenceInterval {
    let sorted = sorted_copy(values);
    let tail = (1.0 - confidence_level) / 2.0;
    ConfidenceInterval {
        lower: empirical_quantile(&sorted, tail),
        upper: empirical_quantile(&sorted, 1.0 - tail),
        level: confidence_level,
    }
}

/// Computes intervals for every variable of a sample set.
pub fn intervals_for_set(
    set: &SampleSet,
    confidence_level: f64,
) -> BTreeMap<String, ConfidenceInterval> {
    set.names()
        .iter()
        .zip(set.columns())
        .map(|(name, column)| (name.clone(), percentile_interval(column, confidence_level)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interval_uniform_grid() {
        let values: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let interval = percentile_interval(&values, 0.95);
        assert_relative_eq!(interval.lower, 2.5);
        assert_relative_eq!(interval.upper, 97.5);
        assert_relative_eq!(interval.level, 0.95);
    }

    #[test]
    fn test_interval_narrows_with_lower_level() {
        let values: Vec<f64> = (0..=1000).map(|i| i as f64 / 10.0).collect();
        let wide = percentile_interval(&values, 0.99);
        let narrow = percentile_interval(&values, 0.80);
        assert!(narrow.width() < wide.width());
    }

    #[test]
    fn test_interval_contains() {
        let interval = ConfidenceInterval {
            lower: -1.0,
            upper: 1.0,
            level: 0.9,
        };
        assert!(interval.contains(0.0));
        assert!(interval.contains(-1.0));
        assert!(!interval.contains(1.5));
    }

    #[test]
    fn test_intervals_for_set() {
        let set = SampleSet::new(
            vec!["x".to_string()],
            vec![(0..=100).map(|i| i as f64).collect()],
        );
        let intervals = intervals_for_set(&set, 0.9);
        assert_relative_eq!(intervals["x"].lower, 5.0);
        assert_relative_eq!(intervals["x"].upper, 95.0);
    }
}
