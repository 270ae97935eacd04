//! Variable specifications.
//!
//! A [`VariableSpec`] names a simulated quantity and binds it to a marginal
//! distribution. Time-series simulations may additionally mark a variable as
//! path dependent via [`PathDynamics`]: its next-step value is the previous
//! step's value perturbed by an explicit drift/volatility increment (a
//! discrete random walk, never a continuous-time process).

use serde::{Deserialize, Serialize};

use crate::distributions::{DistributionError, DistributionSpec};

/// Per-step increment parameters for a path-dependent variable.
///
/// The step update is `x[t] = x[t-1] + drift + volatility · y` where `y` is
/// the variable's correlated standard-normal draw for the step. Both
/// parameters are explicit caller configuration; no particular financial
/// model is assumed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathDynamics {
    /// Deterministic per-step shift.
    pub drift: f64,
    /// Scale of the per-step random shock, must be >= 0.
    pub volatility: f64,
}

impl PathDynamics {
    /// Validates the increment parameters.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if !self.drift.is_finite() {
            return Err(DistributionError::InvalidParameter {
                field: "drift",
                value: self.drift,
                constraint: "must be finite",
            });
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(DistributionError::InvalidParameter {
                field: "volatility",
                value: self.volatility,
                constraint: "must be finite and >= 0",
            });
        }
        Ok(())
    }
}

/// A named simulation variable with its marginal distribution.
///
/// Names must be unique within a request; the engine facade enforces this.
///
/// # Examples
///
/// ```
/// use sim_models::distributions::DistributionSpec;
/// use sim_models::variables::VariableSpec;
///
/// let cost = VariableSpec::new(
///     "unit_cost",
///     DistributionSpec::Triangular { low: 40.0, mode: 55.0, high: 90.0 },
/// )
/// .with_unit("USD");
///
/// assert!(cost.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Variable name, unique within a request.
    pub name: String,
    /// Marginal distribution of the variable.
    pub distribution: DistributionSpec,
    /// Optional unit label, carried through to reporting collaborators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Optional per-step dynamics for time-series simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathDynamics>,
}

impl VariableSpec {
    /// Creates a variable with the given name and marginal distribution.
    pub fn new(name: impl Into<String>, distribution: DistributionSpec) -> Self {
        Self {
            name: name.into(),
            distribution,
            unit: None,
            path: None,
        }
    }

    /// Attaches a unit label.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Marks the variable as path dependent with the given step dynamics.
    pub fn with_path(mut self, path: PathDynamics) -> Self {
        self.path = Some(path);
        self
    }

    /// Returns whether the variable evolves path-dependently in
    /// time-series simulations.
    pub fn is_path_dependent(&self) -> bool {
        self.path.is_some()
    }

    /// Validates the marginal distribution and any path dynamics.
    pub fn validate(&self) -> Result<(), DistributionError> {
        self.distribution.validate()?;
        if let Some(path) = &self.path {
            path.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> DistributionSpec {
        DistributionSpec::Normal {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    #[test]
    fn test_variable_builder() {
        let var = VariableSpec::new("throughput", normal())
            .with_unit("req/s")
            .with_path(PathDynamics {
                drift: 0.5,
                volatility: 2.0,
            });

        assert_eq!(var.name, "throughput");
        assert_eq!(var.unit.as_deref(), Some("req/s"));
        assert!(var.is_path_dependent());
        assert!(var.validate().is_ok());
    }

    #[test]
    fn test_variable_without_path() {
        let var = VariableSpec::new("x", normal());
        assert!(!var.is_path_dependent());
        assert!(var.unit.is_none());
    }

    #[test]
    fn test_invalid_distribution_propagates() {
        let var = VariableSpec::new(
            "x",
            DistributionSpec::Normal {
                mean: 0.0,
                std_dev: -1.0,
            },
        );
        assert!(var.validate().is_err());
    }

    #[test]
    fn test_invalid_path_dynamics() {
        let var = VariableSpec::new("x", normal()).with_path(PathDynamics {
            drift: 0.0,
            volatility: -1.0,
        });
        let err = var.validate().unwrap_err();
        assert!(err.to_string().contains("volatility"));

        let var = VariableSpec::new("x", normal()).with_path(PathDynamics {
            drift: f64::NAN,
            volatility: 1.0,
        });
        assert!(var.validate().is_err());
    }

    #[test]
    fn test_serde_skips_empty_options() {
        let var = VariableSpec::new("x", normal());
        let json = serde_json::to_string(&var).unwrap();
        assert!(!json.contains("unit"));
        assert!(!json.contains("path"));
    }
}
