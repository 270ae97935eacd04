//! Correlation structures and the Gaussian-copula building blocks.
//!
//! This module owns the correlation half of the sampling pipeline:
//!
//! - [`CorrelationMatrix`]: validated symmetric matrix with unit diagonal
//! - [`CholeskyFactor`]: lower-triangular factor used to correlate
//!   independent standard normals
//! - [`factorize`]: policy-controlled decomposition — caller-supplied
//!   matrices fail loudly, internally generated ones may be repaired by
//!   eigenvalue clipping
//! - [`estimate`] / [`significance`]: Pearson estimation and pairwise
//!   t tests over sample columns
//!
//! ## Copula limitation
//!
//! Correlating through a Gaussian copula preserves rank correlation
//! approximately, not exact Pearson correlation, when the marginals are
//! strongly non-Gaussian. This is a property of the construction, not a
//! defect: the normal-scale correlation survives the monotone quantile
//! transforms only up to the distortion those transforms introduce.

pub mod error;
pub mod estimate;
pub mod matrix;
pub mod repair;

pub use error::CorrelationError;
pub use estimate::{estimate, significance, SignificanceReport};
pub use matrix::{CholeskyFactor, CorrelationMatrix, PSD_TOLERANCE};
pub use repair::{clip_to_psd, factorize, Factorized, RepairPolicy, CLIP_EPSILON, MAX_REPAIR_ATTEMPTS};
