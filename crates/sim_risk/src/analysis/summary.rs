//! Per-variable descriptive statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sim_engine::SampleSet;

use super::{empirical_quantile, sorted_copy};

/// The fixed percentile grid reported for every variable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 50th percentile (median).
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
    /// 99th percentile.
    pub p99: f64,
}

/// Descriptive statistics of one variable's draws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Sample mean.
    pub mean: f64,
    /// Sample median.
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    /// Smallest draw.
    pub min: f64,
    /// Largest draw.
    pub max: f64,
    /// Fixed percentile grid.
    pub percentiles: Percentiles,
}

/// Reduces one column of draws to its summary statistics.
///
/// # Panics
/// Panics if `values` is empty; the engine guarantees at least 1000
/// iterations upstream.
pub fn summarize(values: &[f64]) -> SummaryStatistics {
    assert!(!values.is_empty(), "summary of an empty sample");

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = if values.len() > 1 {
        values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };

    let sorted = sorted_copy(values);

    SummaryStatistics {
        mean,
        median: empirical_quantile(&sorted, 0.5),
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentiles: Percentiles {
            p5: empirical_quantile(&sorted, 0.05),
            p25: empirical_quantile(&sorted, 0.25),
            p50: empirical_quantile(&sorted, 0.50),
            p75: empirical_quantile(&sorted, 0.75),
            p95: empirical_quantile(&sorted, 0.95),
            p99: empirical_quantile(&sorted, 0.99),
        },
    }
}

/// Summarises every variable of a sample set, keyed by variable name.
pub fn summarize_set(set: &SampleSet) -> BTreeMap<String, SummaryStatistics> {
    set.names()
        .iter()
        .zip(set.columns())
        .map(|(name, column)| (name.clone(), summarize(column)))
        .collect()
}
