//! Immutable scenario templates.

use serde::{Deserialize, Serialize};

use sim_engine::error::ConfigError;
use sim_models::correlation::CorrelationMatrix;
use sim_models::variables::VariableSpec;

use crate::error::EngineError;
use crate::request::validate_variables;

/// A named, immutable bundle of variables and a default correlation.
///
/// Templates are created at registry construction (or via an explicit
/// `register_scenario` call during composition) and never mutated at
/// runtime. The default correlation is engine-owned, so it is eligible for
/// eigenvalue-clipping repair; a caller override is not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    name: String,
    description: String,
    variables: Vec<VariableSpec>,
    default_correlation: CorrelationMatrix,
}

impl ScenarioTemplate {
    /// Creates a validated template.
    ///
    /// # Errors
    ///
    /// Rejects empty or duplicate variables, invalid marginals, and a
    /// correlation whose dimension does not match the variable count.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        variables: Vec<VariableSpec>,
        default_correlation: CorrelationMatrix,
    ) -> Result<Self, EngineError> {
        validate_variables(&variables)?;
        if default_correlation.dim() != variables.len() {
            return Err(ConfigError::CorrelationShape {
                got: default_correlation.dim(),
                expected: variables.len(),
            }
            .into());
        }
        Ok(Self {
            name: name.into(),
            description: description.into(),
            variables,
            default_correlation,
        })
    }

    /// Returns the template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the template variables.
    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    /// Returns the default correlation matrix.
    pub fn default_correlation(&self) -> &CorrelationMatrix {
        &self.default_correlation
    }
}
