//! # sim_core: Mathematical Foundation for the Simulation Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! sim_core serves as the bottom layer of the 4-layer architecture, providing:
//! - Standard normal distribution functions (`math::normal`)
//! - Special functions for tail probabilities (`math::special`)
//! - Symmetric eigendecomposition for matrix repair (`math::linalg`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other sim_* crates, with a single external
//! dependency:
//! - num-traits: Traits for generic numerical computation
//!
//! Everything above (distribution sampling, correlation handling, the
//! simulation kernel, risk analytics) is built on these primitives.
//!
//! ## Usage Examples
//!
//! ```rust
//! use sim_core::math::normal::{norm_cdf, norm_ppf};
//!
//! // CDF and its inverse agree
//! let p = norm_cdf(1.0_f64);
//! assert!((norm_ppf(p) - 1.0).abs() < 1e-5);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
