//! Top-level engine error taxonomy.
//!
//! [`EngineError`] aggregates the layer errors so callers handle a single
//! sum type. Every variant carries the offending field or value; none are
//! ever converted to default values inside the engine.

use thiserror::Error;

use sim_engine::error::{ConfigError, SamplingError};
use sim_models::correlation::CorrelationError;
use sim_models::distributions::DistributionError;

/// Any failure an engine call can surface to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Request-level configuration failure (bounds, shapes, duplicates).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A distribution specification violates its support constraints.
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// A correlation matrix is malformed or not positive semi-definite.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// A sampling pass produced non-finite values.
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    /// The requested scenario is not in the registry. The engine never
    /// substitutes a default scenario.
    #[error("scenario '{name}' not found (available: {available:?})")]
    ScenarioNotFound {
        /// The unresolved scenario name.
        name: String,
        /// Names currently registered, for the caller's diagnostics.
        available: Vec<String>,
    },

    /// A template with this name is already registered.
    #[error("scenario '{name}' is already registered")]
    ScenarioAlreadyRegistered {
        /// The conflicting name.
        name: String,
    },
}

impl EngineError {
    /// True for request-validation failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Distribution(_))
    }

    /// True when a correlation matrix could not be decomposed.
    pub fn is_not_positive_definite(&self) -> bool {
        matches!(
            self,
            Self::Correlation(CorrelationError::NotPositiveDefinite { .. })
        )
    }

    /// True when a scenario lookup failed.
    pub fn is_scenario_not_found(&self) -> bool {
        matches!(self, Self::ScenarioNotFound { .. })
    }

    /// True when sampling hit numerical instability.
    pub fn is_numerical_instability(&self) -> bool {
        matches!(
            self,
            Self::Sampling(SamplingError::NumericalInstability { .. })
        )
    }
}
