//! Error types for the simulation kernel.
//!
//! [`ConfigError`] covers fail-fast request validation; [`SamplingError`]
//! covers runtime failures inside a sampling pass. Neither is ever
//! swallowed or replaced with a default value.

use thiserror::Error;

/// Configuration errors raised before any sampling work begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Iteration count outside the supported range.
    #[error("invalid iteration count {value}: must be in range [1000, 100000]")]
    InvalidIterationCount {
        /// The rejected count.
        value: usize,
    },

    /// Confidence level outside the supported range.
    #[error("invalid confidence level {value}: must be in range [0.8, 0.99]")]
    InvalidConfidenceLevel {
        /// The rejected level.
        value: f64,
    },

    /// Time step count outside the supported range.
    #[error("invalid time step count {value}: must be in range [1, 1000]")]
    InvalidTimeStepCount {
        /// The rejected count.
        value: usize,
    },

    /// A time-series operation was requested without time steps configured.
    #[error("time-series simulation requires time_steps to be configured")]
    TimeStepsRequired,

    /// Convergence tolerance is not a positive finite number.
    #[error("invalid convergence tolerance {value}: must be positive and finite")]
    InvalidConvergenceTolerance {
        /// The rejected tolerance.
        value: f64,
    },

    /// A request contained no variables.
    #[error("request contains no variables")]
    NoVariables,

    /// Two variables in a request share a name.
    #[error("duplicate variable name '{name}' in request")]
    DuplicateVariable {
        /// The repeated name.
        name: String,
    },

    /// Correlation matrix dimension does not match the variable count.
    #[error("correlation matrix is {got}x{got} but the request has {expected} variables")]
    CorrelationShape {
        /// The matrix dimension.
        got: usize,
        /// The number of request variables.
        expected: usize,
    },

    /// The loss specification names a variable that is not in the request.
    #[error("unknown loss variable '{name}'")]
    UnknownLossVariable {
        /// The unresolved name.
        name: String,
    },

    /// The loss threshold is not a finite number.
    #[error("invalid loss threshold {value}: must be finite")]
    InvalidLossThreshold {
        /// The rejected threshold.
        value: f64,
    },
}

/// Runtime failures inside a sampling pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// A draw produced a non-finite value (overflow or NaN), e.g. an
    /// extreme lognormal scale.
    #[error("numerical instability while sampling '{variable}': non-finite value at iteration {iteration}")]
    NumericalInstability {
        /// The variable whose draw overflowed.
        variable: String,
        /// Zero-based iteration index of the offending draw.
        iteration: usize,
    },
}
