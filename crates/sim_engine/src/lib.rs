//! # sim_engine (L3: Simulation Kernel)
//!
//! Correlated Monte Carlo sampling.
//!
//! This crate provides:
//! - Seeded, reproducible random number generation (`rng`)
//! - Simulation configuration with fail-fast bounds validation (`config`)
//! - The Gaussian-copula sampling kernel for single-pass draws (`sampler`)
//! - Time-series sampling with per-path random-walk dynamics (`timeseries`)
//! - Column-major sample storage (`samples`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             sim_engine (L3)             │
//! ├─────────────────────────────────────────┤
//! │  config/   - iteration + confidence    │
//! │              bounds, builder            │
//! │  rng/      - seeded StdRng wrapper     │
//! │  sampler/  - copula single pass        │
//! │  timeseries/ - stepwise re-draws       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │            sim_models (L2)              │
//! │  distributions, correlation, Cholesky  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Sampling is parallelised with rayon over fixed-size iteration chunks.
//! Each chunk derives its own child RNG from the base seed, so results are
//! reproducible for a given seed regardless of the thread count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod error;
pub mod rng;
pub mod sampler;
pub mod samples;
pub mod timeseries;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use error::{ConfigError, SamplingError};
pub use rng::SimRng;
pub use sampler::run_single_pass;
pub use samples::SampleSet;
pub use timeseries::run_time_series;
