//! Time-series sampling with per-path random-walk dynamics.
//!
//! At each step the kernel re-draws correlated samples. Variables without
//! path dynamics draw fresh values from their static marginal every step;
//! a path-dependent variable instead evolves its previous value:
//!
//! ```text
//! x[t] = x[t-1] + drift + volatility · y
//! ```
//!
//! where `y` is the variable's correlated standard-normal draw for the
//! step. This is a discrete random walk with explicit caller-configured
//! increments — deliberately not a continuous-time SDE discretisation, so
//! each step is deterministic, bounded work that can be tested in
//! isolation.

use rayon::prelude::*;

use sim_models::correlation::CholeskyFactor;
use sim_models::variables::VariableSpec;

use crate::error::SamplingError;
use crate::rng::SimRng;
use crate::sampler::{check_finite, marginal_value, stitch_columns, CHUNK_SIZE};
use crate::samples::SampleSet;

/// Runs a time-series simulation, re-drawing correlated samples at every
/// step.
///
/// # Arguments
///
/// * `variables` - Validated variable specifications, in request order
/// * `factor` - Cholesky factor of the correlation matrix, same order
/// * `iterations` - Number of joint paths per step
/// * `time_steps` - Number of steps (>= 1)
/// * `rng` - Base generator; each (step, chunk) pair derives its own child
///
/// # Returns
///
/// One [`SampleSet`] per step. Step 0 draws every variable from its base
/// marginal; later steps evolve path-dependent variables row-by-row.
///
/// # Errors
///
/// `SamplingError::NumericalInstability` if any draw is non-finite.
pub fn run_time_series(
    variables: &[VariableSpec],
    factor: &CholeskyFactor,
    iterations: usize,
    time_steps: usize,
    rng: &SimRng,
) -> Result<Vec<SampleSet>, SamplingError> {
    debug_assert_eq!(factor.dim(), variables.len());
    debug_assert!(time_steps >= 1);

    tracing::debug!(
        iterations,
        time_steps,
        variables = variables.len(),
        seed = rng.seed(),
        "running time-series simulation"
    );

    let k = variables.len();
    let names: Vec<String> = variables.iter().map(|v| v.name.clone()).collect();
    let n_chunks = iterations.div_ceil(CHUNK_SIZE);

    let mut steps_out: Vec<SampleSet> = Vec::with_capacity(time_steps);

    for step in 0..time_steps {
        let columns = {
            let previous = steps_out.last().map(SampleSet::columns);

            let chunk_columns: Vec<Vec<Vec<f64>>> = (0..n_chunks)
                .into_par_iter()
                .map(|chunk| {
                    let mut chunk_rng = rng.child(stream_id(step, chunk));
                    let start = chunk * CHUNK_SIZE;
                    let len = CHUNK_SIZE.min(iterations - start);
                    draw_step_chunk(variables, factor, len, start, previous, &mut chunk_rng)
                })
                .collect();

            stitch_columns(k, iterations, chunk_columns)
        };

        let set = SampleSet::new(names.clone(), columns);
        check_finite(&set)?;
        steps_out.push(set);
    }

    Ok(steps_out)
}

/// Unique, deterministic stream id per (step, chunk) pair.
#[inline]
fn stream_id(step: usize, chunk: usize) -> u64 {
    ((step as u64) << 32) | chunk as u64
}

/// Draws `len` rows of one step, starting at global row `start`.
fn draw_step_chunk(
    variables: &[VariableSpec],
    factor: &CholeskyFactor,
    len: usize,
    start: usize,
    previous: Option<&[Vec<f64>]>,
    rng: &mut SimRng,
) -> Vec<Vec<f64>> {
    let k = variables.len();
    let mut columns: Vec<Vec<f64>> = (0..k).map(|_| Vec::with_capacity(len)).collect();
    let mut z = vec![0.0; k];

    for row in 0..len {
        rng.fill_normal(&mut z);
        factor.transform_inplace(&mut z);
        for (j, variable) in variables.iter().enumerate() {
            let value = match (&variable.path, previous) {
                // Path-dependent step: evolve this path's previous value
                (Some(path), Some(prev)) => {
                    prev[j][start + row] + path.drift + path.volatility * z[j]
                }
                // First step, or a static variable: fresh marginal draw
                _ => marginal_value(variable, z[j]),
            };
            columns[j].push(value);
        }
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_models::correlation::{factorize, CorrelationMatrix, RepairPolicy};
    use sim_models::distributions::DistributionSpec;
    use sim_models::variables::PathDynamics;

    fn normal_var(name: &str, mean: f64, std_dev: f64) -> VariableSpec {
        VariableSpec::new(name, DistributionSpec::Normal { mean, std_dev })
    }

    fn identity_factor(dim: usize) -> CholeskyFactor {
        factorize(&CorrelationMatrix::identity(dim), RepairPolicy::Strict)
            .unwrap()
            .factor
    }

    fn column_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_time_series_shape() {
        let variables = [normal_var("x", 0.0, 1.0), normal_var("y", 5.0, 1.0)];
        let factor = identity_factor(2);
        let rng = SimRng::from_seed(2);

        let steps = run_time_series(&variables, &factor, 2_000, 4, &rng).unwrap();
        assert_eq!(steps.len(), 4);
        for step in &steps {
            assert_eq!(step.iterations(), 2_000);
            assert_eq!(step.variable_count(), 2);
        }
    }

    #[test]
    fn test_time_series_reproducible() {
        let variables = [normal_var("x", 0.0, 1.0)];
        let factor = identity_factor(1);

        let a = run_time_series(&variables, &factor, 1_500, 3, &SimRng::from_seed(9)).unwrap();
        let b = run_time_series(&variables, &factor, 1_500, 3, &SimRng::from_seed(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_static_variables_redraw_every_step() {
        let variables = [normal_var("x", 10.0, 1.0)];
        let factor = identity_factor(1);
        let rng = SimRng::from_seed(4);

        let steps = run_time_series(&variables, &factor, 5_000, 3, &rng).unwrap();
        // Every step draws from the same static marginal
        for step in &steps {
            assert_relative_eq!(column_mean(step.column("x").unwrap()), 10.0, epsilon = 0.2);
        }
        // And the draws themselves differ between steps
        assert_ne!(steps[0], steps[1]);
    }

    #[test]
    fn test_path_dependent_drift_accumulates() {
        // Pure drift, no volatility: x[t] = x[0] + t · drift exactly
        let variables = [normal_var("level", 100.0, 1.0).with_path(PathDynamics {
            drift: 2.0,
            volatility: 0.0,
        })];
        let factor = identity_factor(1);
        let rng = SimRng::from_seed(21);

        let steps = run_time_series(&variables, &factor, 1_000, 5, &rng).unwrap();
        let base = steps[0].column("level").unwrap().to_vec();
        for (t, step) in steps.iter().enumerate().skip(1) {
            let column = step.column("level").unwrap();
            for (x0, xt) in base.iter().zip(column) {
                assert_relative_eq!(*xt, x0 + 2.0 * t as f64, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_path_dependent_variance_grows() {
        // Random walk variance grows linearly in the step count
        let variables = [normal_var("walk", 0.0, 1.0).with_path(PathDynamics {
            drift: 0.0,
            volatility: 1.0,
        })];
        let factor = identity_factor(1);
        let rng = SimRng::from_seed(33);

        let steps = run_time_series(&variables, &factor, 20_000, 10, &rng).unwrap();

        let variance = |values: &[f64]| {
            let mean = column_mean(values);
            values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / values.len() as f64
        };

        let var_first = variance(steps[0].column("walk").unwrap());
        let var_last = variance(steps[9].column("walk").unwrap());

        // Step 0 draws N(0, 1); after 9 increments variance is ~10
        assert_relative_eq!(var_first, 1.0, epsilon = 0.1);
        assert_relative_eq!(var_last, 10.0, epsilon = 1.0);
    }

    #[test]
    fn test_mixed_static_and_path_variables() {
        let variables = [
            normal_var("static", 50.0, 5.0),
            normal_var("walk", 0.0, 1.0).with_path(PathDynamics {
                drift: 1.0,
                volatility: 0.5,
            }),
        ];
        let matrix = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
        let factor = factorize(&matrix, RepairPolicy::Strict).unwrap().factor;
        let rng = SimRng::from_seed(55);

        let steps = run_time_series(&variables, &factor, 5_000, 6, &rng).unwrap();
        // Static variable keeps its mean; the walk drifts upwards
        assert_relative_eq!(
            column_mean(steps[5].column("static").unwrap()),
            50.0,
            epsilon = 0.5
        );
        assert_relative_eq!(
            column_mean(steps[5].column("walk").unwrap()),
            5.0,
            epsilon = 0.2
        );
    }

    #[test]
    fn test_single_step_equals_single_pass_draws() {
        // One step of the time series is just a single-pass draw
        let variables = [normal_var("x", 0.0, 1.0)];
        let factor = identity_factor(1);

        let steps =
            run_time_series(&variables, &factor, 1_000, 1, &SimRng::from_seed(77)).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].iterations(), 1_000);
    }
}
