//! Parametric distribution library.
//!
//! This module provides the six distribution families supported by the
//! simulation engine, each with:
//! - **Validation**: support constraints checked before any draw
//! - **Sampling**: batch draws via `rand_distr`
//! - **Quantile functions**: inverse CDFs used by the Gaussian copula
//!
//! Quantiles are analytic for normal, lognormal, uniform, and triangular
//! marginals; the beta quantile inverts the regularised incomplete beta
//! numerically, and the empirical quantile inverts the histogram CDF.

pub mod error;

pub use error::DistributionError;

use rand::Rng;
use rand_distr::{Beta, Distribution as _, LogNormal, Normal, Triangular};
use serde::{Deserialize, Serialize};
use sim_core::math::normal::norm_ppf;
use sim_core::math::special::inc_beta;

/// Tolerance for the empirical weight sum check.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Bisection steps for the beta quantile (gives ~1e-19 interval width).
const BETA_QUANTILE_ITERATIONS: usize = 64;

/// Identifies a distribution family without carrying its parameters.
///
/// Used by the engine facade to advertise the supported families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    /// Normal (Gaussian) distribution.
    Normal,
    /// Lognormal distribution.
    #[serde(rename = "lognormal")]
    LogNormal,
    /// Beta distribution on [0, 1].
    Beta,
    /// Continuous uniform distribution.
    Uniform,
    /// Triangular distribution.
    Triangular,
    /// Empirical histogram distribution.
    Empirical,
}

impl DistributionKind {
    /// All supported families, in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::Normal,
        Self::LogNormal,
        Self::Beta,
        Self::Uniform,
        Self::Triangular,
        Self::Empirical,
    ];

    /// Stable lower-case name of the family.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LogNormal => "lognormal",
            Self::Beta => "beta",
            Self::Uniform => "uniform",
            Self::Triangular => "triangular",
            Self::Empirical => "empirical",
        }
    }
}

/// A fully parameterised marginal distribution.
///
/// # Support Constraints
///
/// | Family      | Constraint                                            |
/// |-------------|-------------------------------------------------------|
/// | normal      | `std_dev > 0`                                         |
/// | lognormal   | `scale > 0` (parameters of the underlying normal)     |
/// | beta        | `alpha > 0`, `beta > 0`                               |
/// | uniform     | `min < max`                                           |
/// | triangular  | `low <= mode <= high`, `low < high`                   |
/// | empirical   | sorted bin edges, weights summing to 1 (within 1e-6)  |
///
/// # Examples
///
/// ```
/// use sim_models::distributions::DistributionSpec;
///
/// let spec = DistributionSpec::Normal { mean: 100.0, std_dev: 10.0 };
/// assert!(spec.validate().is_ok());
///
/// let bad = DistributionSpec::Beta { alpha: -1.0, beta: 2.0 };
/// assert!(bad.validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    /// Normal distribution with the given mean and standard deviation.
    Normal {
        /// Location parameter.
        mean: f64,
        /// Standard deviation, must be positive.
        std_dev: f64,
    },
    /// Lognormal distribution; `location` and `scale` are the mean and
    /// standard deviation of the underlying normal.
    #[serde(rename = "lognormal")]
    LogNormal {
        /// Mean of the underlying normal.
        location: f64,
        /// Standard deviation of the underlying normal, must be positive.
        scale: f64,
    },
    /// Beta distribution on [0, 1].
    Beta {
        /// First shape parameter, must be positive.
        alpha: f64,
        /// Second shape parameter, must be positive.
        beta: f64,
    },
    /// Continuous uniform distribution on [min, max].
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound, must exceed `min`.
        max: f64,
    },
    /// Triangular distribution on [low, high] with the given mode.
    Triangular {
        /// Lower bound.
        low: f64,
        /// Most likely value, in [low, high].
        mode: f64,
        /// Upper bound, must exceed `low`.
        high: f64,
    },
    /// Empirical histogram: `edges` are the sorted bin boundaries and
    /// `weights[i]` is the probability mass of `[edges[i], edges[i + 1])`.
    Empirical {
        /// Sorted bin edges (`weights.len() + 1` entries).
        edges: Vec<f64>,
        /// Per-bin probability masses summing to 1.
        weights: Vec<f64>,
    },
}

impl DistributionSpec {
    /// Returns the family of this specification.
    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Normal { .. } => DistributionKind::Normal,
            Self::LogNormal { .. } => DistributionKind::LogNormal,
            Self::Beta { .. } => DistributionKind::Beta,
            Self::Uniform { .. } => DistributionKind::Uniform,
            Self::Triangular { .. } => DistributionKind::Triangular,
            Self::Empirical { .. } => DistributionKind::Empirical,
        }
    }

    /// Validates the parameters against the family's support constraints.
    ///
    /// Runs before any sampling begins. The returned error names the
    /// offending field and value.
    pub fn validate(&self) -> Result<(), DistributionError> {
        fn require_finite(field: &'static str, value: f64) -> Result<(), DistributionError> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(DistributionError::InvalidParameter {
                    field,
                    value,
                    constraint: "must be finite",
                })
            }
        }

        match self {
            Self::Normal { mean, std_dev } => {
                require_finite("mean", *mean)?;
                require_finite("std_dev", *std_dev)?;
                if *std_dev <= 0.0 {
                    return Err(DistributionError::InvalidParameter {
                        field: "std_dev",
                        value: *std_dev,
                        constraint: "must be > 0",
                    });
                }
                Ok(())
            }
            Self::LogNormal { location, scale } => {
                require_finite("location", *location)?;
                require_finite("scale", *scale)?;
                if *scale <= 0.0 {
                    return Err(DistributionError::InvalidParameter {
                        field: "scale",
                        value: *scale,
                        constraint: "must be > 0",
                    });
                }
                Ok(())
            }
            Self::Beta { alpha, beta } => {
                require_finite("alpha", *alpha)?;
                require_finite("beta", *beta)?;
                if *alpha <= 0.0 {
                    return Err(DistributionError::InvalidParameter {
                        field: "alpha",
                        value: *alpha,
                        constraint: "must be > 0",
                    });
                }
                if *beta <= 0.0 {
                    return Err(DistributionError::InvalidParameter {
                        field: "beta",
                        value: *beta,
                        constraint: "must be > 0",
                    });
                }
                Ok(())
            }
            Self::Uniform { min, max } => {
                require_finite("min", *min)?;
                require_finite("max", *max)?;
                if min >= max {
                    return Err(DistributionError::InvalidParameter {
                        field: "min",
                        value: *min,
                        constraint: "must be < max",
                    });
                }
                Ok(())
            }
            Self::Triangular { low, mode, high } => {
                require_finite("low", *low)?;
                require_finite("mode", *mode)?;
                require_finite("high", *high)?;
                if low >= high {
                    return Err(DistributionError::InvalidParameter {
                        field: "low",
                        value: *low,
                        constraint: "must be < high",
                    });
                }
                if mode < low || mode > high {
                    return Err(DistributionError::InvalidParameter {
                        field: "mode",
                        value: *mode,
                        constraint: "must lie in [low, high]",
                    });
                }
                Ok(())
            }
            Self::Empirical { edges, weights } => {
                if edges.len() < 2 {
                    return Err(DistributionError::TooFewEdges { got: edges.len() });
                }
                if weights.len() + 1 != edges.len() {
                    return Err(DistributionError::EdgeCountMismatch {
                        edges: edges.len(),
                        weights: weights.len(),
                    });
                }
                for (index, edge) in edges.iter().enumerate() {
                    require_finite("edges", *edge)?;
                    if index > 0 && edges[index - 1] >= *edge {
                        return Err(DistributionError::EdgesNotSorted { index });
                    }
                }
                let mut sum = 0.0;
                for (index, weight) in weights.iter().enumerate() {
                    if !weight.is_finite() || *weight < 0.0 {
                        return Err(DistributionError::InvalidWeight {
                            index,
                            value: *weight,
                        });
                    }
                    sum += weight;
                }
                if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                    return Err(DistributionError::WeightsNotNormalised { sum });
                }
                Ok(())
            }
        }
    }

    /// Returns the (lower, upper) support bounds.
    ///
    /// Unbounded ends are ±∞.
    pub fn support(&self) -> (f64, f64) {
        match self {
            Self::Normal { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Self::LogNormal { .. } => (0.0, f64::INFINITY),
            Self::Beta { .. } => (0.0, 1.0),
            Self::Uniform { min, max } => (*min, *max),
            Self::Triangular { low, high, .. } => (*low, *high),
            Self::Empirical { edges, .. } => (
                edges.first().copied().unwrap_or(f64::NEG_INFINITY),
                edges.last().copied().unwrap_or(f64::INFINITY),
            ),
        }
    }

    /// Returns the analytic mean of the distribution.
    ///
    /// Assumes the parameters have been validated.
    pub fn mean(&self) -> f64 {
        match self {
            Self::Normal { mean, .. } => *mean,
            Self::LogNormal { location, scale } => (location + 0.5 * scale * scale).exp(),
            Self::Beta { alpha, beta } => alpha / (alpha + beta),
            Self::Uniform { min, max } => 0.5 * (min + max),
            Self::Triangular { low, mode, high } => (low + mode + high) / 3.0,
            Self::Empirical { edges, weights } => weights
                .iter()
                .enumerate()
                .map(|(i, w)| w * 0.5 * (edges[i] + edges[i + 1]))
                .sum(),
        }
    }

    /// Inverse CDF (quantile function).
    ///
    /// `p` is clamped into [0, 1]. For distributions with unbounded support
    /// the extreme probabilities map to ±∞; the sampling kernel clamps its
    /// uniforms away from the boundary, so those values never enter a
    /// sample set.
    ///
    /// # Arguments
    /// * `p` - Probability in [0, 1]
    ///
    /// # Examples
    /// ```
    /// use sim_models::distributions::DistributionSpec;
    ///
    /// let spec = DistributionSpec::Uniform { min: 2.0, max: 4.0 };
    /// assert!((spec.quantile(0.5) - 3.0).abs() < 1e-12);
    /// ```
    pub fn quantile(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Self::Normal { mean, std_dev } => mean + std_dev * norm_ppf(p),
            Self::LogNormal { location, scale } => (location + scale * norm_ppf(p)).exp(),
            Self::Beta { alpha, beta } => beta_quantile(*alpha, *beta, p),
            Self::Uniform { min, max } => min + p * (max - min),
            Self::Triangular { low, mode, high } => {
                let span = high - low;
                let mode_fraction = (mode - low) / span;
                if p < mode_fraction {
                    low + (p * span * (mode - low)).sqrt()
                } else {
                    high - ((1.0 - p) * span * (high - mode)).sqrt()
                }
            }
            Self::Empirical { edges, weights } => empirical_quantile(edges, weights, p),
        }
    }

    /// Fills `out` with independent draws from this distribution.
    ///
    /// Validation runs first; nothing is drawn if any parameter is invalid.
    ///
    /// # Arguments
    /// * `rng` - Source of randomness
    /// * `out` - Pre-allocated output buffer
    pub fn sample_into<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        out: &mut [f64],
    ) -> Result<(), DistributionError> {
        self.validate()?;

        match self {
            Self::Normal { mean, std_dev } => {
                let dist = Normal::new(*mean, *std_dev).map_err(|_| {
                    DistributionError::InvalidParameter {
                        field: "std_dev",
                        value: *std_dev,
                        constraint: "must be > 0",
                    }
                })?;
                for value in out.iter_mut() {
                    *value = dist.sample(rng);
                }
            }
            Self::LogNormal { location, scale } => {
                let dist = LogNormal::new(*location, *scale).map_err(|_| {
                    DistributionError::InvalidParameter {
                        field: "scale",
                        value: *scale,
                        constraint: "must be > 0",
                    }
                })?;
                for value in out.iter_mut() {
                    *value = dist.sample(rng);
                }
            }
            Self::Beta { alpha, beta } => {
                let dist = Beta::new(*alpha, *beta).map_err(|_| {
                    DistributionError::InvalidParameter {
                        field: "alpha",
                        value: *alpha,
                        constraint: "must be > 0",
                    }
                })?;
                for value in out.iter_mut() {
                    *value = dist.sample(rng);
                }
            }
            Self::Uniform { min, max } => {
                let span = max - min;
                for value in out.iter_mut() {
                    *value = min + span * rng.gen::<f64>();
                }
            }
            Self::Triangular { low, mode, high } => {
                let dist = Triangular::new(*low, *high, *mode).map_err(|_| {
                    DistributionError::InvalidParameter {
                        field: "mode",
                        value: *mode,
                        constraint: "must lie in [low, high]",
                    }
                })?;
                for value in out.iter_mut() {
                    *value = dist.sample(rng);
                }
            }
            Self::Empirical { .. } => {
                for value in out.iter_mut() {
                    *value = self.quantile(rng.gen::<f64>());
                }
            }
        }

        Ok(())
    }

    /// Draws `n` independent samples.
    ///
    /// Convenience wrapper over [`sample_into`](Self::sample_into).
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<f64>, DistributionError> {
        let mut out = vec![0.0; n];
        self.sample_into(rng, &mut out)?;
        Ok(out)
    }
}

/// Beta quantile by bisection on the regularised incomplete beta.
///
/// Monotone and robust for all valid shape parameters; 64 halvings narrow
/// the bracket far below sampling noise.
fn beta_quantile(alpha: f64, beta: f64, p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..BETA_QUANTILE_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if inc_beta(alpha, beta, mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Empirical quantile by histogram CDF inversion with linear interpolation
/// inside the selected bin.
fn empirical_quantile(edges: &[f64], weights: &[f64], p: f64) -> f64 {
    let mut acc = 0.0;
    let last = weights.len() - 1;
    for (i, w) in weights.iter().enumerate() {
        let next = acc + w;
        if p <= next || i == last {
            let fraction = if *w > 0.0 {
                ((p - acc) / w).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return edges[i] + fraction * (edges[i + 1] - edges[i]);
        }
        acc = next;
    }
    // Unreachable: the loop always returns on the last bin
    edges[edges.len() - 1]
}
