//! Request types consumed by the engine facade.

use serde::{Deserialize, Serialize};

use sim_engine::error::ConfigError;
use sim_engine::SimulationConfig;
use sim_models::correlation::CorrelationMatrix;
use sim_models::variables::VariableSpec;

use crate::error::EngineError;

/// Designates the loss variable and threshold for risk metrics.
///
/// When absent, the first request variable is used with a threshold of 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossSpec {
    /// Variable to compute risk metrics on; defaults to the first variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Outcomes strictly below this count as losses for `prob_loss`.
    pub threshold: f64,
}

impl LossSpec {
    /// Validates the threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidLossThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// A fully custom simulation request.
///
/// This is the inbound shape consumed from the calling layer: variables
/// with their marginals, an optional caller-supplied correlation matrix
/// (never silently adjusted), the run configuration, and an optional loss
/// designation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Simulation variables, unique names, in matrix order.
    pub variables: Vec<VariableSpec>,
    /// Optional correlation matrix over the variables, in request order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    /// Run configuration.
    pub config: SimulationConfig,
    /// Optional loss designation for risk metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<LossSpec>,
}

/// Caller adjustments applied on top of a scenario template.
///
/// Variables are merged by name: an override with a known name replaces
/// the template's variable, an unknown name is appended. A supplied
/// correlation matrix replaces the template default entirely and is
/// treated as caller-supplied (strict, never repaired).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverrides {
    /// Variables to replace or append, matched by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableSpec>,
    /// Replacement correlation matrix (caller-supplied semantics).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    /// Loss designation override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<LossSpec>,
}

impl ScenarioOverrides {
    /// Returns overrides that leave the template untouched.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.correlation.is_none() && self.loss.is_none()
    }
}

/// Validates a variable list: non-empty, unique names, valid marginals.
pub(crate) fn validate_variables(variables: &[VariableSpec]) -> Result<(), EngineError> {
    if variables.is_empty() {
        return Err(ConfigError::NoVariables.into());
    }
    for (index, variable) in variables.iter().enumerate() {
        variable.validate()?;
        if variables[..index].iter().any(|v| v.name == variable.name) {
            return Err(ConfigError::DuplicateVariable {
                name: variable.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}
