//! Running-mean convergence diagnostic.
//!
//! Records the running mean of the loss variable at 10%, 25%, 50%, 75%,
//! and 100% of iterations. The run is flagged converged when the relative
//! change between the final two checkpoints falls below the configured
//! tolerance. A cheap O(iterations) diagnostic, not a formal stopping
//! rule: it tells the caller whether the estimate had stabilised, nothing
//! more.

use serde::{Deserialize, Serialize};

/// Checkpoint fractions of the iteration count.
pub const CHECKPOINT_FRACTIONS: [f64; 5] = [0.10, 0.25, 0.50, 0.75, 1.00];

/// Guard against division by zero in the relative-change computation.
const RELATIVE_CHANGE_FLOOR: f64 = 1e-12;

/// One running-mean observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceCheckpoint {
    /// Fraction of total iterations this checkpoint was taken at.
    pub fraction: f64,
    /// Number of iterations included.
    pub iterations: usize,
    /// Running mean over those iterations.
    pub running_mean: f64,
}

/// The convergence diagnostic of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Running means at [`CHECKPOINT_FRACTIONS`].
    pub checkpoints: Vec<ConvergenceCheckpoint>,
    /// True when the relative change between the final two checkpoints is
    /// below `tolerance`.
    pub converged: bool,
    /// The tolerance the flag was evaluated at.
    pub tolerance: f64,
}

/// Computes the convergence diagnostic over a column of draws, in draw
/// order.
///
/// # Arguments
/// * `values` - Draws of the loss variable, in iteration order
/// * `tolerance` - Relative-change tolerance (typically 0.01)
///
/// # Panics
/// Panics if `values` is empty.
pub fn convergence_analysis(values: &[f64], tolerance: f64) -> ConvergenceReport {
    assert!(!values.is_empty(), "convergence analysis of an empty sample");

    let n = values.len();
    let mut checkpoints = Vec::with_capacity(CHECKPOINT_FRACTIONS.len());

    let mut cumulative = 0.0;
    let mut consumed = 0;
    for &fraction in CHECKPOINT_FRACTIONS.iter() {
        let count = ((fraction * n as f64).round() as usize).clamp(1, n);
        while consumed < count {
            cumulative += values[consumed];
            consumed += 1;
        }
        checkpoints.push(ConvergenceCheckpoint {
            fraction,
            iterations: count,
            running_mean: cumulative / count as f64,
        });
    }

    let last = checkpoints[checkpoints.len() - 1].running_mean;
    let prev = checkpoints[checkpoints.len() - 2].running_mean;
    let relative_change = (last - prev).abs() / prev.abs().max(RELATIVE_CHANGE_FLOOR);

    ConvergenceReport {
        checkpoints,
        converged: relative_change < tolerance,
        tolerance,
    }
}
