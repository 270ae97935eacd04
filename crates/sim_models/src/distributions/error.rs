//! Error types for distribution validation.

use thiserror::Error;

/// Errors raised when a distribution specification violates its support
/// constraints.
///
/// Validation runs before any sampling begins, never lazily mid-draw, and
/// every variant names the offending field and value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A scalar parameter violates its constraint.
    #[error("invalid parameter '{field}': {value} ({constraint})")]
    InvalidParameter {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable constraint description.
        constraint: &'static str,
    },

    /// An empirical histogram has too few bin edges.
    #[error("empirical histogram needs at least 2 bin edges, got {got}")]
    TooFewEdges {
        /// Number of edges supplied.
        got: usize,
    },

    /// Empirical bin edges and weights have inconsistent lengths.
    #[error("empirical histogram with {edges} edges needs {edges} - 1 weights, got {weights}")]
    EdgeCountMismatch {
        /// Number of edges supplied.
        edges: usize,
        /// Number of weights supplied.
        weights: usize,
    },

    /// Empirical bin edges are not strictly increasing.
    #[error("empirical bin edges must be strictly increasing (violation at index {index})")]
    EdgesNotSorted {
        /// Index of the first out-of-order edge.
        index: usize,
    },

    /// An empirical weight is negative or non-finite.
    #[error("empirical weight at index {index} is {value}, must be finite and >= 0")]
    InvalidWeight {
        /// Index of the offending weight.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// Empirical weights do not sum to one.
    #[error("empirical weights sum to {sum}, must equal 1.0 within 1e-6")]
    WeightsNotNormalised {
        /// The actual weight sum.
        sum: f64,
    },
}
