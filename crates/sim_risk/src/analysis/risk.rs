//! Value-at-risk metrics.
//!
//! The loss variable follows the value convention: lower outcomes are
//! worse. `VaR_p` is the empirical `(1 - p)`-quantile of the outcome
//! distribution (the level only `1 - p` of outcomes fall below), and
//! `CVaR_p` is the mean of the outcomes at or below that level.

use serde::{Deserialize, Serialize};

use super::{empirical_quantile, sorted_copy};

/// Tail risk metrics for the designated loss variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Variable the metrics were computed on.
    pub variable: String,
    /// Caller-supplied loss threshold used for `prob_loss`.
    pub threshold: f64,
    /// Value at risk at the 95% level (5th percentile of outcomes).
    pub var_95: f64,
    /// Value at risk at the 99% level (1st percentile of outcomes).
    pub var_99: f64,
    /// Expected outcome given it is at or below `var_95`.
    pub cvar_95: f64,
    /// Expected outcome given it is at or below `var_99`.
    pub cvar_99: f64,
    /// Fraction of outcomes strictly below the loss threshold.
    pub prob_loss: f64,
}

/// Mean of the sorted tail at or below the `(1 - p)` quantile.
fn tail_mean(sorted: &[f64], p: f64) -> f64 {
    let cutoff = ((1.0 - p) * (sorted.len() - 1) as f64).floor() as usize;
    let tail = &sorted[..=cutoff];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Computes VaR, CVaR, and probability of loss for one column of draws.
///
/// # Arguments
/// * `values` - Non-empty outcome column of the loss variable
/// * `variable` - Name of that variable, echoed into the result
/// * `threshold` - Loss threshold; `prob_loss` is the fraction of draws
///   strictly below it
///
/// # Panics
/// Panics if `values` is empty.
pub fn compute_risk_metrics(values: &[f64], variable: &str, threshold: f64) -> RiskMetrics {
    assert!(!values.is_empty(), "risk metrics of an empty sample");

    let sorted = sorted_copy(values);
    let below = values.iter().filter(|v| **v < threshold).count();

    RiskMetrics {
        variable: variable.to_string(),
        threshold,
        var_95: empirical_quantile(&sorted, 0.05),
        var_99: empirical_quantile(&sorted, 0.01),
        cvar_95: tail_mean(&sorted, 0.95),
        cvar_99: tail_mean(&sorted, 0.99),
        prob_loss: below as f64 / values.len() as f64,
    }
}
