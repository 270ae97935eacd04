//! Single-pass Gaussian-copula sampling.
//!
//! The kernel draws an n×k matrix of standard normals, correlates each row
//! through the Cholesky factor of the correlation matrix, maps the
//! correlated normals through the standard normal CDF to uniforms, and
//! pushes those through each variable's inverse CDF. The result carries
//! the requested correlation structure on the normal scale while every
//! marginal matches its specification exactly.
//!
//! Iterations are split into fixed-size chunks processed in parallel with
//! rayon; each chunk derives a deterministic child RNG from the base seed,
//! so a run is reproducible regardless of thread count.

use rayon::prelude::*;

use sim_core::math::normal::norm_cdf;
use sim_models::correlation::CholeskyFactor;
use sim_models::variables::VariableSpec;

use crate::error::SamplingError;
use crate::rng::SimRng;
use crate::samples::SampleSet;

/// Iterations per parallel work unit.
pub(crate) const CHUNK_SIZE: usize = 4_096;

/// Uniforms are clamped into [floor, 1 - floor] before quantile
/// transformation so unbounded marginals never see u = 0 or u = 1.
pub(crate) const UNIFORM_FLOOR: f64 = 1e-12;

/// Runs one correlated sampling pass.
///
/// # Arguments
///
/// * `variables` - Validated variable specifications, in request order
/// * `factor` - Cholesky factor of the correlation matrix, same order
/// * `iterations` - Number of joint draws
/// * `rng` - Base generator; chunks derive child streams from it
///
/// # Preconditions
///
/// Variables are validated and `factor.dim() == variables.len()`. The
/// facade enforces both before calling in.
///
/// # Errors
///
/// `SamplingError::NumericalInstability` if any draw is non-finite (e.g.
/// lognormal overflow under an extreme scale parameter).
pub fn run_single_pass(
    variables: &[VariableSpec],
    factor: &CholeskyFactor,
    iterations: usize,
    rng: &SimRng,
) -> Result<SampleSet, SamplingError> {
    debug_assert_eq!(factor.dim(), variables.len());
    debug_assert!(!variables.is_empty());

    tracing::debug!(
        iterations,
        variables = variables.len(),
        seed = rng.seed(),
        "running single-pass correlated draw"
    );

    let n_chunks = iterations.div_ceil(CHUNK_SIZE);
    let chunk_columns: Vec<Vec<Vec<f64>>> = (0..n_chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut chunk_rng = rng.child(chunk as u64);
            let start = chunk * CHUNK_SIZE;
            let len = CHUNK_SIZE.min(iterations - start);
            draw_chunk(variables, factor, len, &mut chunk_rng)
        })
        .collect();

    let columns = stitch_columns(variables.len(), iterations, chunk_columns);
    let names = variables.iter().map(|v| v.name.clone()).collect();
    let set = SampleSet::new(names, columns);

    check_finite(&set)?;
    Ok(set)
}

/// Draws `len` correlated rows into fresh per-variable columns.
fn draw_chunk(
    variables: &[VariableSpec],
    factor: &CholeskyFactor,
    len: usize,
    rng: &mut SimRng,
) -> Vec<Vec<f64>> {
    let k = variables.len();
    let mut columns: Vec<Vec<f64>> = (0..k).map(|_| Vec::with_capacity(len)).collect();
    let mut z = vec![0.0; k];

    for _ in 0..len {
        rng.fill_normal(&mut z);
        factor.transform_inplace(&mut z);
        for (j, variable) in variables.iter().enumerate() {
            columns[j].push(marginal_value(variable, z[j]));
        }
    }

    columns
}

/// Maps one correlated standard normal through a variable's marginal.
#[inline]
pub(crate) fn marginal_value(variable: &VariableSpec, y: f64) -> f64 {
    let u = norm_cdf(y).clamp(UNIFORM_FLOOR, 1.0 - UNIFORM_FLOOR);
    variable.distribution.quantile(u)
}

/// Concatenates per-chunk columns back into request order.
pub(crate) fn stitch_columns(
    k: usize,
    iterations: usize,
    chunk_columns: Vec<Vec<Vec<f64>>>,
) -> Vec<Vec<f64>> {
    let mut columns: Vec<Vec<f64>> = (0..k).map(|_| Vec::with_capacity(iterations)).collect();
    for chunk in chunk_columns {
        for (j, column) in chunk.into_iter().enumerate() {
            columns[j].extend(column);
        }
    }
    columns
}

/// Rejects sample sets containing non-finite draws.
pub(crate) fn check_finite(set: &SampleSet) -> Result<(), SamplingError> {
    for (name, column) in set.names().iter().zip(set.columns()) {
        if let Some(iteration) = column.iter().position(|v| !v.is_finite()) {
            return Err(SamplingError::NumericalInstability {
                variable: name.clone(),
                iteration,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_models::correlation::{factorize, CorrelationMatrix, RepairPolicy};
    use sim_models::distributions::DistributionSpec;

    fn normal_var(name: &str, mean: f64, std_dev: f64) -> VariableSpec {
        VariableSpec::new(name, DistributionSpec::Normal { mean, std_dev })
    }

    fn factor_for(matrix: &CorrelationMatrix) -> sim_models::correlation::CholeskyFactor {
        factorize(matrix, RepairPolicy::Strict).unwrap().factor
    }

    fn column_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_single_pass_shape() {
        let variables = [normal_var("x", 0.0, 1.0), normal_var("y", 10.0, 2.0)];
        let factor = factor_for(&CorrelationMatrix::identity(2));
        let rng = SimRng::from_seed(1);

        let set = run_single_pass(&variables, &factor, 5_000, &rng).unwrap();
        assert_eq!(set.iterations(), 5_000);
        assert_eq!(set.variable_count(), 2);
        assert_eq!(set.names(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_single_pass_reproducible() {
        let variables = [normal_var("x", 0.0, 1.0)];
        let factor = factor_for(&CorrelationMatrix::identity(1));

        let a = run_single_pass(&variables, &factor, 2_000, &SimRng::from_seed(5)).unwrap();
        let b = run_single_pass(&variables, &factor, 2_000, &SimRng::from_seed(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_pass_marginals_match() {
        let variables = [normal_var("x", 100.0, 10.0), normal_var("y", 50.0, 5.0)];
        let matrix = CorrelationMatrix::new(&[1.0, 0.8, 0.8, 1.0], 2).unwrap();
        let factor = factor_for(&matrix);
        let rng = SimRng::from_seed(42);

        let set = run_single_pass(&variables, &factor, 20_000, &rng).unwrap();
        let x = set.column("x").unwrap();
        let y = set.column("y").unwrap();

        assert_relative_eq!(column_mean(x), 100.0, epsilon = 0.3);
        assert_relative_eq!(column_mean(y), 50.0, epsilon = 0.2);
    }

    #[test]
    fn test_single_pass_correlation_recovered() {
        let variables = [normal_var("x", 100.0, 10.0), normal_var("y", 50.0, 5.0)];
        let matrix = CorrelationMatrix::new(&[1.0, 0.8, 0.8, 1.0], 2).unwrap();
        let factor = factor_for(&matrix);
        let rng = SimRng::from_seed(42);

        let set = run_single_pass(&variables, &factor, 20_000, &rng).unwrap();
        let estimated = sim_models::correlation::estimate(set.columns()).unwrap();
        let rho = estimated.get(0, 1);
        assert!(
            (0.75..=0.85).contains(&rho),
            "estimated correlation {} outside [0.75, 0.85]",
            rho
        );
    }

    #[test]
    fn test_single_pass_bounded_marginals_stay_in_support() {
        let variables = [
            VariableSpec::new(
                "fraction",
                DistributionSpec::Beta {
                    alpha: 2.0,
                    beta: 5.0,
                },
            ),
            VariableSpec::new(
                "duration",
                DistributionSpec::Triangular {
                    low: 1.0,
                    mode: 2.0,
                    high: 4.0,
                },
            ),
        ];
        let matrix = CorrelationMatrix::new(&[1.0, 0.6, 0.6, 1.0], 2).unwrap();
        let factor = factor_for(&matrix);
        let rng = SimRng::from_seed(3);

        let set = run_single_pass(&variables, &factor, 5_000, &rng).unwrap();
        assert!(set
            .column("fraction")
            .unwrap()
            .iter()
            .all(|v| (0.0..=1.0).contains(v)));
        assert!(set
            .column("duration")
            .unwrap()
            .iter()
            .all(|v| (1.0..=4.0).contains(v)));
    }

    #[test]
    fn test_extreme_lognormal_raises_instability() {
        // A lognormal scale of 500 overflows f64 in the tails
        let variables = [VariableSpec::new(
            "blowup",
            DistributionSpec::LogNormal {
                location: 0.0,
                scale: 500.0,
            },
        )];
        let factor = factor_for(&CorrelationMatrix::identity(1));
        let rng = SimRng::from_seed(8);

        let result = run_single_pass(&variables, &factor, 5_000, &rng);
        match result {
            Err(SamplingError::NumericalInstability { variable, .. }) => {
                assert_eq!(variable, "blowup");
            }
            other => panic!("expected NumericalInstability, got {:?}", other),
        }
    }

    #[test]
    fn test_chunk_boundaries_do_not_duplicate_draws() {
        // More iterations than one chunk: adjacent chunks must differ
        let variables = [normal_var("x", 0.0, 1.0)];
        let factor = factor_for(&CorrelationMatrix::identity(1));
        let rng = SimRng::from_seed(13);

        let set = run_single_pass(&variables, &factor, CHUNK_SIZE * 2, &rng).unwrap();
        let x = set.column("x").unwrap();
        let first = &x[..CHUNK_SIZE];
        let second = &x[CHUNK_SIZE..];
        assert_ne!(first, second);
    }
}
