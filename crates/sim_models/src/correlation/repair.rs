//! Eigenvalue-clipping repair and policy-controlled factorisation.
//!
//! Repair replaces negative eigenvalues with a small positive floor,
//! reconstructs the matrix, and re-normalises the diagonal back to 1. The
//! [`RepairPolicy`] decides who is eligible: internally generated matrices
//! (random draws, scenario defaults) are clipped; caller-supplied matrices
//! are never adjusted and fail loudly instead, so callers always simulate
//! the correlation structure they asked for.

use sim_core::math::linalg::sym_eigen;

use super::error::CorrelationError;
use super::matrix::{CholeskyFactor, CorrelationMatrix};

/// Floor applied to clipped eigenvalues.
pub const CLIP_EPSILON: f64 = 1e-8;

/// Maximum clipping retries before factorisation gives up.
pub const MAX_REPAIR_ATTEMPTS: usize = 2;

/// Whether an indefinite matrix may be repaired before factorisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairPolicy {
    /// Never adjust: an indefinite matrix is an error. Applied to
    /// caller-supplied matrices.
    Strict,
    /// Repair by eigenvalue clipping, up to [`MAX_REPAIR_ATTEMPTS`] times.
    /// Applied to internally generated matrices.
    Clip,
}

/// Outcome of a successful factorisation.
#[derive(Clone, Debug)]
pub struct Factorized {
    /// Lower-triangular Cholesky factor of the (possibly repaired) matrix.
    pub factor: CholeskyFactor,
    /// The matrix that was actually decomposed.
    pub matrix: CorrelationMatrix,
    /// True if eigenvalue clipping was applied.
    pub adjusted: bool,
}

/// Repairs a matrix to the nearest valid correlation matrix by eigenvalue
/// clipping.
///
/// Negative (and near-zero) eigenvalues are raised to [`CLIP_EPSILON`], the
/// matrix is reconstructed from the clipped spectrum, and the diagonal is
/// re-normalised to 1 with off-diagonals clamped into [-1, 1].
///
/// # Returns
///
/// The repaired matrix and a flag indicating whether anything changed. A
/// matrix whose smallest eigenvalue already clears the floor is returned
/// unchanged.
pub fn clip_to_psd(matrix: &CorrelationMatrix) -> (CorrelationMatrix, bool) {
    let n = matrix.dim();
    let eig = sym_eigen(matrix.as_slice(), n);
    if eig.min_value() >= CLIP_EPSILON {
        return (matrix.clone(), false);
    }

    let clipped: Vec<f64> = eig.values.iter().map(|&l| l.max(CLIP_EPSILON)).collect();
    let rebuilt = eig.reconstruct(&clipped);

    // Re-normalise so the diagonal is exactly 1 again
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let denom = (rebuilt[i * n + i] * rebuilt[j * n + j]).sqrt();
            let rho = if denom > 0.0 {
                (rebuilt[i * n + j] / denom).clamp(-1.0, 1.0)
            } else {
                0.0
            };
            data[i * n + j] = rho;
            data[j * n + i] = rho;
        }
    }

    (CorrelationMatrix::from_raw(data, n), true)
}

/// Factorises a correlation matrix under the given repair policy.
///
/// # Arguments
///
/// * `matrix` - The matrix to decompose
/// * `policy` - [`RepairPolicy::Strict`] for caller-supplied matrices,
///   [`RepairPolicy::Clip`] for internally generated ones
///
/// # Errors
///
/// `CorrelationError::NotPositiveDefinite` when the matrix cannot be
/// decomposed: immediately under `Strict`, or after
/// [`MAX_REPAIR_ATTEMPTS`] clipping rounds under `Clip`.
///
/// # Examples
///
/// ```
/// use sim_models::correlation::{factorize, CorrelationMatrix, RepairPolicy};
///
/// let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
/// let result = factorize(&corr, RepairPolicy::Strict).unwrap();
/// assert!(!result.adjusted);
/// ```
pub fn factorize(
    matrix: &CorrelationMatrix,
    policy: RepairPolicy,
) -> Result<Factorized, CorrelationError> {
    let err = match matrix.cholesky() {
        Ok(factor) => {
            return Ok(Factorized {
                factor,
                matrix: matrix.clone(),
                adjusted: false,
            });
        }
        Err(err) => err,
    };

    if policy == RepairPolicy::Strict {
        return Err(err);
    }

    let mut current = matrix.clone();
    let mut last_err = err;
    for _ in 0..MAX_REPAIR_ATTEMPTS {
        let (repaired, _) = clip_to_psd(&current);
        current = repaired;
        match current.cholesky() {
            Ok(factor) => {
                return Ok(Factorized {
                    factor,
                    matrix: current,
                    adjusted: true,
                });
            }
            Err(e) => last_err = e,
        }
    }

    Err(last_err)
}
