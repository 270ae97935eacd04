//! Correlation matrix with validation and Cholesky decomposition.
//!
//! Given `n` independent standard normal random variables
//! `Z = [Z1, ..., Zn]`, correlated normals `W` are obtained as `W = L · Z`
//! where `L` is the lower-triangular Cholesky factor of the correlation
//! matrix `C = L · Lᵀ`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sim_core::math::linalg::sym_eigen;

use super::error::CorrelationError;
use super::repair::clip_to_psd;

/// Numerical tolerance for diagonal and symmetry validation.
const VALIDATION_EPSILON: f64 = 1e-10;

/// Eigenvalue tolerance for the positive semi-definiteness check.
pub const PSD_TOLERANCE: f64 = 1e-8;

/// Correlation matrix over the variables of a request, in request order.
///
/// A correlation matrix must satisfy:
/// - Square and symmetric
/// - Diagonal elements equal to 1.0
/// - Off-diagonal elements in [-1, 1]
/// - Positive semi-definite (for Cholesky: positive definite)
///
/// Construction via [`new`](Self::new) validates everything except
/// positive semi-definiteness, which is checked when the matrix is
/// factorised or explicitly via
/// [`is_positive_semi_definite`](Self::is_positive_semi_definite).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Matrix elements in row-major order.
    data: Vec<f64>,
    /// Matrix dimension (n x n).
    dim: usize,
}

impl CorrelationMatrix {
    /// Creates a new correlation matrix from a flat row-major array.
    ///
    /// # Arguments
    ///
    /// * `data` - Matrix elements in row-major order (`dim * dim` elements)
    /// * `dim` - Matrix dimension
    ///
    /// # Validation
    ///
    /// - Must have exactly `dim * dim` elements
    /// - Diagonal elements must be 1.0
    /// - Must be symmetric
    /// - Off-diagonal elements must be in [-1, 1]
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_models::correlation::CorrelationMatrix;
    ///
    /// let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
    /// assert_eq!(corr.dim(), 2);
    /// ```
    pub fn new(data: &[f64], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        // Validate diagonal (must be 1.0)
        for i in 0..dim {
            let diag = data[i * dim + i];
            if (diag - 1.0).abs() > VALIDATION_EPSILON {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag,
                });
            }
        }

        // Validate symmetry and range
        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if (val_ij - val_ji).abs() > VALIDATION_EPSILON {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }

                if !(-1.0..=1.0).contains(&val_ij) {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij,
                    });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Creates an identity correlation matrix (no correlation).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Draws a random symmetric matrix with off-diagonals in [-1, 1] and
    /// repairs it to the nearest valid correlation matrix by eigenvalue
    /// clipping.
    ///
    /// # Returns
    ///
    /// The matrix and a flag indicating whether repair was needed. The
    /// result always satisfies the PSD invariant.
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> (Self, bool) {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
            for j in (i + 1)..dim {
                let rho = 2.0 * rng.gen::<f64>() - 1.0;
                data[i * dim + j] = rho;
                data[j * dim + i] = rho;
            }
        }
        let raw = Self { data, dim };
        clip_to_psd(&raw)
    }

    /// Crate-internal constructor for matrices produced by repair or
    /// estimation, which are symmetric with a unit diagonal by
    /// construction.
    pub(crate) fn from_raw(data: Vec<f64>, dim: usize) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { data, dim }
    }

    /// Returns the matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the element at (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Returns the flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the smallest eigenvalue.
    pub fn min_eigenvalue(&self) -> f64 {
        sym_eigen(&self.data, self.dim).min_value()
    }

    /// Checks positive semi-definiteness up to [`PSD_TOLERANCE`].
    pub fn is_positive_semi_definite(&self) -> bool {
        self.min_eigenvalue() >= -PSD_TOLERANCE
    }

    /// Computes the Cholesky decomposition (lower triangular L with
    /// `C = L · Lᵀ`).
    ///
    /// # Returns
    ///
    /// `Ok(CholeskyFactor)` if the matrix is positive definite,
    /// `Err(CorrelationError::NotPositiveDefinite)` otherwise. Whether a
    /// failed matrix may be repaired is the caller's policy decision; see
    /// [`factorize`](super::repair::factorize).
    pub fn cholesky(&self) -> Result<CholeskyFactor, CorrelationError> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = 0.0;

                if j == i {
                    // Diagonal element
                    for k in 0..j {
                        let l_jk = lower[j * n + k];
                        sum += l_jk * l_jk;
                    }
                    let diag = self.get(j, j) - sum;
                    if diag <= 0.0 {
                        return Err(CorrelationError::NotPositiveDefinite {
                            min_eigenvalue: self.min_eigenvalue(),
                        });
                    }
                    lower[j * n + j] = diag.sqrt();
                } else {
                    // Off-diagonal element
                    for k in 0..j {
                        sum += lower[i * n + k] * lower[j * n + k];
                    }
                    let l_jj = lower[j * n + j];
                    if l_jj <= 0.0 {
                        return Err(CorrelationError::NotPositiveDefinite {
                            min_eigenvalue: self.min_eigenvalue(),
                        });
                    }
                    lower[i * n + j] = (self.get(i, j) - sum) / l_jj;
                }
            }
        }

        Ok(CholeskyFactor {
            data: lower,
            dim: n,
        })
    }
}

/// Lower triangular Cholesky factor of a correlation matrix.
///
/// Used to transform independent standard normals into correlated normals.
#[derive(Clone, Debug)]
pub struct CholeskyFactor {
    /// Lower triangular matrix elements (row-major).
    data: Vec<f64>,
    /// Matrix dimension.
    dim: usize,
}

impl CholeskyFactor {
    /// Returns the matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the element at (i, j); zero above the diagonal.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Transforms independent standard normals to correlated normals.
    ///
    /// Given independent Z ~ N(0, 1), computes W = L · Z. The resulting W
    /// carries the correlation structure of the decomposed matrix.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        assert!(
            z.len() >= self.dim,
            "input vector length {} is less than matrix dimension {}",
            z.len(),
            self.dim
        );

        let n = self.dim;
        let mut w = Vec::with_capacity(n);

        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..=i {
                sum += self.get(i, j) * z[j];
            }
            w.push(sum);
        }

        w
    }

    /// Transforms independent normals in place.
    ///
    /// Avoids an allocation per draw in the sampling loop; the hot path of
    /// the copula kernel goes through here.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform_inplace(&self, z: &mut [f64]) {
        assert!(
            z.len() >= self.dim,
            "input vector length {} is less than matrix dimension {}",
            z.len(),
            self.dim
        );

        let n = self.dim;

        // W = L · Z: rows processed bottom-up so each output only reads
        // inputs that have not yet been overwritten
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in 0..=i {
                sum += self.get(i, j) * z[j];
            }
            z[i] = sum;
        }
    }
}
