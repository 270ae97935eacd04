//! Symmetric eigendecomposition via the cyclic Jacobi method.
//!
//! Correlation matrices are small (a handful up to a few dozen variables),
//! so the classic Jacobi rotation scheme is both simple and fast enough.
//! It is used to check positive semi-definiteness and to repair indefinite
//! matrices by eigenvalue clipping.

/// Maximum number of Jacobi sweeps before declaring non-convergence.
const MAX_SWEEPS: usize = 64;

/// Off-diagonal magnitude below which an element is treated as zero.
const OFF_DIAGONAL_TOLERANCE: f64 = 1e-12;

/// Result of a symmetric eigendecomposition.
///
/// Satisfies `A = V · diag(values) · Vᵀ` where the j-th column of `V` is
/// the eigenvector stored at `vectors[i * dim + j]` for component `i`.
#[derive(Clone, Debug)]
pub struct SymEigen {
    /// Eigenvalues, in no particular order.
    pub values: Vec<f64>,
    /// Eigenvectors, row-major with one eigenvector per column.
    pub vectors: Vec<f64>,
    /// Matrix dimension.
    pub dim: usize,
}

impl SymEigen {
    /// Returns the smallest eigenvalue.
    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Reconstructs `V · diag(clipped) · Vᵀ` with eigenvalues replaced by
    /// `clipped`.
    ///
    /// # Panics
    /// Panics if `clipped.len() != self.dim`.
    pub fn reconstruct(&self, clipped: &[f64]) -> Vec<f64> {
        assert_eq!(clipped.len(), self.dim);
        let n = self.dim;
        let mut out = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let mut sum = 0.0;
                for (k, lambda) in clipped.iter().enumerate() {
                    sum += self.vectors[i * n + k] * lambda * self.vectors[j * n + k];
                }
                out[i * n + j] = sum;
                out[j * n + i] = sum;
            }
        }
        out
    }
}

/// Computes the eigendecomposition of a symmetric matrix.
///
/// # Arguments
/// * `matrix` - Row-major n×n symmetric matrix (only the upper triangle is
///   trusted; the lower triangle is assumed to mirror it)
/// * `dim` - Matrix dimension n
///
/// # Returns
/// The eigenvalues and an orthonormal eigenvector basis.
///
/// # Panics
/// Panics if `matrix.len() != dim * dim`.
///
/// # Examples
/// ```
/// use sim_core::math::linalg::sym_eigen;
///
/// // Eigenvalues of [[1, r], [r, 1]] are 1 ± r
/// let eig = sym_eigen(&[1.0, 0.5, 0.5, 1.0], 2);
/// let mut values = eig.values.clone();
/// values.sort_by(f64::total_cmp);
/// assert!((values[0] - 0.5).abs() < 1e-10);
/// assert!((values[1] - 1.5).abs() < 1e-10);
/// ```
pub fn sym_eigen(matrix: &[f64], dim: usize) -> SymEigen {
    assert_eq!(matrix.len(), dim * dim, "matrix must be {dim}x{dim}");

    let n = dim;
    let mut a = matrix.to_vec();

    // Eigenvector accumulator starts as the identity
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    for _ in 0..MAX_SWEEPS {
        // Sum of squared off-diagonal elements drives convergence
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[p * n + q] * a[p * n + q];
            }
        }
        if off.sqrt() < OFF_DIAGONAL_TOLERANCE {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq.abs() < OFF_DIAGONAL_TOLERANCE {
                    continue;
                }

                let app = a[p * n + p];
                let aqq = a[q * n + q];

                // Rotation angle annihilating a[p][q]
                let theta = (aqq - app) / (2.0 * apq);
                let t = if theta >= 0.0 {
                    1.0 / (theta + (theta * theta + 1.0).sqrt())
                } else {
                    -1.0 / (-theta + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // Update the matrix: A' = Jᵀ A J
                for k in 0..n {
                    let akp = a[k * n + p];
                    let akq = a[k * n + q];
                    a[k * n + p] = c * akp - s * akq;
                    a[k * n + q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p * n + k];
                    let aqk = a[q * n + k];
                    a[p * n + k] = c * apk - s * aqk;
                    a[q * n + k] = s * apk + c * aqk;
                }

                // Accumulate the rotation into the eigenvector basis
                for k in 0..n {
                    let vkp = v[k * n + p];
                    let vkq = v[k * n + q];
                    v[k * n + p] = c * vkp - s * vkq;
                    v[k * n + q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i * n + i]).collect();

    SymEigen {
        values,
        vectors: v,
        dim: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn test_identity_eigenvalues() {
        let eig = sym_eigen(&[1.0, 0.0, 0.0, 1.0], 2);
        assert_relative_eq!(eig.values[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(eig.values[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_2x2_known_eigenvalues() {
        // [[1, r], [r, 1]] has eigenvalues 1 ± r
        let eig = sym_eigen(&[1.0, 0.8, 0.8, 1.0], 2);
        let values = sorted(eig.values.clone());
        assert_relative_eq!(values[0], 0.2, epsilon = 1e-10);
        assert_relative_eq!(values[1], 1.8, epsilon = 1e-10);
    }

    #[test]
    fn test_equicorrelation_eigenvalues() {
        // Equicorrelated 3x3 with ρ: eigenvalues 1 + 2ρ and 1 - ρ (twice)
        let rho = -0.65;
        #[rustfmt::skip]
        let m = [
            1.0, rho, rho,
            rho, 1.0, rho,
            rho, rho, 1.0,
        ];
        let eig = sym_eigen(&m, 3);
        let values = sorted(eig.values.clone());
        assert_relative_eq!(values[0], 1.0 + 2.0 * rho, epsilon = 1e-9);
        assert_relative_eq!(values[1], 1.0 - rho, epsilon = 1e-9);
        assert_relative_eq!(values[2], 1.0 - rho, epsilon = 1e-9);
        assert_relative_eq!(eig.min_value(), -0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_reconstruction_roundtrip() {
        #[rustfmt::skip]
        let m = [
            1.0, 0.3, 0.2,
            0.3, 1.0, 0.4,
            0.2, 0.4, 1.0,
        ];
        let eig = sym_eigen(&m, 3);
        let rebuilt = eig.reconstruct(&eig.values);
        for (orig, back) in m.iter().zip(rebuilt.iter()) {
            assert_relative_eq!(orig, back, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_eigenvectors_orthonormal() {
        #[rustfmt::skip]
        let m = [
            1.0, 0.5, -0.2,
            0.5, 1.0, 0.3,
            -0.2, 0.3, 1.0,
        ];
        let eig = sym_eigen(&m, 3);
        let n = 3;
        for j in 0..n {
            for l in 0..n {
                let mut dot = 0.0;
                for i in 0..n {
                    dot += eig.vectors[i * n + j] * eig.vectors[i * n + l];
                }
                let expected = if j == l { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_trace_preserved() {
        // Sum of eigenvalues equals the trace
        #[rustfmt::skip]
        let m = [
            1.0, 0.9, -0.3,
            0.9, 1.0, 0.1,
            -0.3, 0.1, 1.0,
        ];
        let eig = sym_eigen(&m, 3);
        let sum: f64 = eig.values.iter().sum();
        assert_relative_eq!(sum, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clipped_reconstruction_is_psd() {
        // Clipping negatives and reconstructing yields a PSD matrix
        let rho = -0.65;
        #[rustfmt::skip]
        let m = [
            1.0, rho, rho,
            rho, 1.0, rho,
            rho, rho, 1.0,
        ];
        let eig = sym_eigen(&m, 3);
        let clipped: Vec<f64> = eig.values.iter().map(|&l| l.max(1e-10)).collect();
        let rebuilt = eig.reconstruct(&clipped);
        let eig2 = sym_eigen(&rebuilt, 3);
        assert!(eig2.min_value() >= -1e-10);
    }

    #[test]
    fn test_larger_matrix() {
        // 5x5 PSD matrix built as B Bᵀ stays PSD under decomposition
        let n = 5;
        let mut b = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                b[i * n + j] = ((i * 7 + j * 3) % 11) as f64 / 11.0;
            }
        }
        let mut m = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += b[i * n + k] * b[j * n + k];
                }
                m[i * n + j] = sum;
            }
        }
        let eig = sym_eigen(&m, n);
        assert!(eig.min_value() >= -1e-9);
        let rebuilt = eig.reconstruct(&eig.values);
        for (orig, back) in m.iter().zip(rebuilt.iter()) {
            assert_relative_eq!(orig, back, epsilon = 1e-8);
        }
    }
}
