//! Error types for correlation operations.

use thiserror::Error;

/// Errors raised while building, validating, repairing, or decomposing
/// correlation matrices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive semi-definite and was not (or must not be)
    /// repaired.
    #[error("correlation matrix is not positive semi-definite (minimum eigenvalue {min_eigenvalue:.6})")]
    NotPositiveDefinite {
        /// Smallest eigenvalue found.
        min_eigenvalue: f64,
    },

    /// Flat data length does not match the declared dimension.
    #[error("invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count (`dim * dim`).
        expected: usize,
        /// Actual element count supplied.
        got: usize,
    },

    /// A diagonal element differs from 1.
    #[error("diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The matrix is not symmetric.
    #[error("matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },

    /// An off-diagonal entry lies outside [-1, 1].
    #[error("correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// The offending value.
        value: f64,
    },

    /// Sample columns passed to estimation have differing lengths.
    #[error("sample column {index} has {got} observations, expected {expected}")]
    LengthMismatch {
        /// Index of the offending column.
        index: usize,
        /// Observations in that column.
        got: usize,
        /// Observations in the first column.
        expected: usize,
    },

    /// Too few observations for the requested statistic.
    #[error("need at least {need} observations, got {got}")]
    InsufficientObservations {
        /// Observations supplied.
        got: usize,
        /// Minimum required.
        need: usize,
    },

    /// Significance level outside the open unit interval.
    #[error("significance level {value} must lie in (0, 1)")]
    InvalidAlpha {
        /// The rejected level.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_positive_definite_display() {
        let err = CorrelationError::NotPositiveDefinite {
            min_eigenvalue: -0.3,
        };
        assert!(err.to_string().contains("positive semi-definite"));
        assert!(err.to_string().contains("-0.3"));
    }

    #[test]
    fn test_invalid_dimensions_display() {
        let err = CorrelationError::InvalidDimensions {
            expected: 4,
            got: 3,
        };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_clone_and_equality() {
        let err = CorrelationError::NotSymmetric { i: 0, j: 1 };
        assert_eq!(err.clone(), err);
    }
}
