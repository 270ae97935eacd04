//! Simulation configuration.
//!
//! [`SimulationConfig`] carries the knobs shared by every simulation mode:
//! iteration count, confidence level, optional time steps, optional seed,
//! and the convergence tolerance. Bounds are enforced before any sampling
//! work begins (fail fast), never mid-run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum number of Monte Carlo iterations.
pub const MIN_ITERATIONS: usize = 1_000;

/// Maximum number of Monte Carlo iterations.
pub const MAX_ITERATIONS: usize = 100_000;

/// Minimum supported confidence level.
pub const MIN_CONFIDENCE_LEVEL: f64 = 0.80;

/// Maximum supported confidence level.
pub const MAX_CONFIDENCE_LEVEL: f64 = 0.99;

/// Maximum number of time-series steps.
pub const MAX_TIME_STEPS: usize = 1_000;

/// Default relative tolerance for the convergence diagnostic.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 0.01;

/// Immutable configuration for a simulation run.
///
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use sim_engine::config::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .iterations(10_000)
///     .confidence_level(0.95)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.iterations(), 10_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of Monte Carlo iterations.
    iterations: usize,
    /// Two-sided confidence level for interval estimation.
    confidence_level: f64,
    /// Optional number of time-series steps.
    time_steps: Option<usize>,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Relative tolerance for the convergence diagnostic.
    convergence_tolerance: f64,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the iteration count.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the confidence level.
    #[inline]
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Returns the configured time step count, if any.
    #[inline]
    pub fn time_steps(&self) -> Option<usize> {
        self.time_steps
    }

    /// Returns the configured seed, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the convergence tolerance.
    #[inline]
    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    /// Validates the configuration bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `iterations` is outside [1000, 100000]
    /// - `confidence_level` is outside [0.8, 0.99]
    /// - `time_steps` is Some(0) or exceeds 1000
    /// - `convergence_tolerance` is not positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations < MIN_ITERATIONS || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::InvalidIterationCount {
                value: self.iterations,
            });
        }
        if !self.confidence_level.is_finite()
            || self.confidence_level < MIN_CONFIDENCE_LEVEL
            || self.confidence_level > MAX_CONFIDENCE_LEVEL
        {
            return Err(ConfigError::InvalidConfidenceLevel {
                value: self.confidence_level,
            });
        }
        if let Some(steps) = self.time_steps {
            if steps == 0 || steps > MAX_TIME_STEPS {
                return Err(ConfigError::InvalidTimeStepCount { value: steps });
            }
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(ConfigError::InvalidConvergenceTolerance {
                value: self.convergence_tolerance,
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Validation runs at build time, so an invalid configuration never
/// escapes the builder.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    iterations: Option<usize>,
    confidence_level: Option<f64>,
    time_steps: Option<usize>,
    seed: Option<u64>,
    convergence_tolerance: Option<f64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of Monte Carlo iterations (required).
    #[inline]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Sets the confidence level (default 0.95).
    #[inline]
    pub fn confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = Some(confidence_level);
        self
    }

    /// Sets the number of time-series steps.
    #[inline]
    pub fn time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = Some(time_steps);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the convergence tolerance (default 0.01).
    #[inline]
    pub fn convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = Some(tolerance);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `iterations` is missing or any bound is
    /// violated.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let iterations = self
            .iterations
            .ok_or(ConfigError::InvalidIterationCount { value: 0 })?;

        let config = SimulationConfig {
            iterations,
            confidence_level: self.confidence_level.unwrap_or(0.95),
            time_steps: self.time_steps,
            seed: self.seed,
            convergence_tolerance: self
                .convergence_tolerance
                .unwrap_or(DEFAULT_CONVERGENCE_TOLERANCE),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_valid() {
        let config = SimulationConfig::builder()
            .iterations(10_000)
            .build()
            .unwrap();

        assert_eq!(config.iterations(), 10_000);
        assert_eq!(config.confidence_level(), 0.95);
        assert_eq!(config.time_steps(), None);
        assert_eq!(config.seed(), None);
        assert_eq!(config.convergence_tolerance(), DEFAULT_CONVERGENCE_TOLERANCE);
    }

    #[test]
    fn test_builder_full() {
        let config = SimulationConfig::builder()
            .iterations(20_000)
            .confidence_level(0.9)
            .time_steps(12)
            .seed(7)
            .convergence_tolerance(0.005)
            .build()
            .unwrap();

        assert_eq!(config.iterations(), 20_000);
        assert_eq!(config.confidence_level(), 0.9);
        assert_eq!(config.time_steps(), Some(12));
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.convergence_tolerance(), 0.005);
    }

    #[test]
    fn test_iterations_lower_boundary() {
        // 999 rejected, 1000 accepted
        let result = SimulationConfig::builder().iterations(999).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidIterationCount { value: 999 })
        ));

        let config = SimulationConfig::builder().iterations(1_000).build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_iterations_upper_boundary() {
        // 100000 accepted, 100001 rejected
        let config = SimulationConfig::builder().iterations(100_000).build();
        assert!(config.is_ok());

        let result = SimulationConfig::builder().iterations(100_001).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidIterationCount { value: 100_001 })
        ));
    }

    #[test]
    fn test_confidence_level_bounds() {
        for bad in [0.5, 0.79, 0.991, 1.5, f64::NAN] {
            let result = SimulationConfig::builder()
                .iterations(1_000)
                .confidence_level(bad)
                .build();
            assert!(
                matches!(result, Err(ConfigError::InvalidConfidenceLevel { .. })),
                "confidence level {} should be rejected",
                bad
            );
        }

        for good in [0.8, 0.9, 0.95, 0.99] {
            assert!(SimulationConfig::builder()
                .iterations(1_000)
                .confidence_level(good)
                .build()
                .is_ok());
        }
    }

    #[test]
    fn test_time_steps_bounds() {
        let result = SimulationConfig::builder()
            .iterations(1_000)
            .time_steps(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidTimeStepCount { value: 0 })
        ));

        let result = SimulationConfig::builder()
            .iterations(1_000)
            .time_steps(MAX_TIME_STEPS + 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_convergence_tolerance_bounds() {
        for bad in [0.0, -0.01, f64::INFINITY] {
            let result = SimulationConfig::builder()
                .iterations(1_000)
                .convergence_tolerance(bad)
                .build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidConvergenceTolerance { .. })
            ));
        }
    }

    #[test]
    fn test_missing_iterations() {
        let result = SimulationConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SimulationConfig::builder()
            .iterations(5_000)
            .seed(11)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
