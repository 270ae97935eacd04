//! Pearson correlation estimation and pairwise significance testing.

use serde::{Deserialize, Serialize};
use sim_core::math::special::student_t_two_sided_p;

use super::error::CorrelationError;
use super::matrix::CorrelationMatrix;

/// Minimum observations for a correlation estimate.
const MIN_OBSERVATIONS_ESTIMATE: usize = 2;

/// Minimum observations for a t test (degrees of freedom n - 2 >= 1).
const MIN_OBSERVATIONS_TEST: usize = 3;

/// Pairwise significance test results.
///
/// `significant[i][j]` is true when the correlation between columns i and j
/// is significant at the configured level; `p_values[i][j]` holds the
/// two-sided p-value. Diagonals are trivially significant with p = 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignificanceReport {
    /// Boolean significance matrix at the configured level.
    pub significant: Vec<Vec<bool>>,
    /// Two-sided p-value matrix.
    pub p_values: Vec<Vec<f64>>,
    /// Significance level the booleans were thresholded at.
    pub alpha: f64,
}

/// Validates that columns are non-empty and rectangular, returning the
/// observation count.
fn observation_count(
    columns: &[Vec<f64>],
    need: usize,
) -> Result<usize, CorrelationError> {
    let n = columns.first().map_or(0, Vec::len);
    for (index, column) in columns.iter().enumerate() {
        if column.len() != n {
            return Err(CorrelationError::LengthMismatch {
                index,
                got: column.len(),
                expected: n,
            });
        }
    }
    if n < need {
        return Err(CorrelationError::InsufficientObservations { got: n, need });
    }
    Ok(n)
}

/// Estimates the Pearson correlation matrix over sample columns.
///
/// Degenerate columns (zero variance) correlate as 0 with everything, so
/// the result always satisfies the correlation-matrix invariants.
///
/// # Arguments
///
/// * `columns` - One vector of observations per variable, equal lengths
///
/// # Errors
///
/// `LengthMismatch` for ragged input, `InsufficientObservations` for fewer
/// than 2 rows.
///
/// # Examples
///
/// ```
/// use sim_models::correlation::estimate;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0];
/// let y = vec![2.0, 4.0, 6.0, 8.0];
/// let corr = estimate(&[x, y]).unwrap();
/// assert!((corr.get(0, 1) - 1.0).abs() < 1e-12);
/// ```
pub fn estimate(columns: &[Vec<f64>]) -> Result<CorrelationMatrix, CorrelationError> {
    let k = columns.len();
    if k == 0 {
        return Ok(CorrelationMatrix::identity(0));
    }
    let n = observation_count(columns, MIN_OBSERVATIONS_ESTIMATE)?;
    let n_f = n as f64;

    let means: Vec<f64> = columns
        .iter()
        .map(|column| column.iter().sum::<f64>() / n_f)
        .collect();

    // Centred sums of squares per column
    let sq_sums: Vec<f64> = columns
        .iter()
        .zip(&means)
        .map(|(column, mean)| column.iter().map(|x| (x - mean) * (x - mean)).sum())
        .collect();

    let mut data = vec![0.0; k * k];
    for i in 0..k {
        data[i * k + i] = 1.0;
        for j in (i + 1)..k {
            let cross: f64 = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(x, y)| (x - means[i]) * (y - means[j]))
                .sum();
            let denom = (sq_sums[i] * sq_sums[j]).sqrt();
            let rho = if denom > 0.0 {
                (cross / denom).clamp(-1.0, 1.0)
            } else {
                0.0
            };
            data[i * k + j] = rho;
            data[j * k + i] = rho;
        }
    }

    Ok(CorrelationMatrix::from_raw(data, k))
}

/// Tests each variable pair for significant correlation.
///
/// Uses the t statistic `r · sqrt((n - 2) / (1 - r²))` against a Student-t
/// distribution with n - 2 degrees of freedom, two-sided.
///
/// # Arguments
///
/// * `columns` - One vector of observations per variable, equal lengths
/// * `alpha` - Significance level in (0, 1)
///
/// # Errors
///
/// `InvalidAlpha` for a level outside (0, 1); `LengthMismatch` /
/// `InsufficientObservations` as for [`estimate`] (at least 3 rows here).
pub fn significance(
    columns: &[Vec<f64>],
    alpha: f64,
) -> Result<SignificanceReport, CorrelationError> {
    if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(CorrelationError::InvalidAlpha { value: alpha });
    }

    let k = columns.len();
    let n = observation_count(columns, MIN_OBSERVATIONS_TEST)?;
    let corr = estimate(columns)?;
    let dof = (n - 2) as f64;

    let mut p_values = vec![vec![0.0; k]; k];
    let mut significant = vec![vec![true; k]; k];

    for i in 0..k {
        for j in (i + 1)..k {
            let r = corr.get(i, j);
            let denom = 1.0 - r * r;
            // |r| of 1 is off the t scale and maximally significant
            let p = if denom <= f64::EPSILON {
                0.0
            } else {
                let t = r * (dof / denom).sqrt();
                student_t_two_sided_p(t, dof)
            };
            p_values[i][j] = p;
            p_values[j][i] = p;
            let is_significant = p < alpha;
            significant[i][j] = is_significant;
            significant[j][i] = is_significant;
        }
    }

    Ok(SignificanceReport {
        significant,
        p_values,
        alpha,
    })
}
