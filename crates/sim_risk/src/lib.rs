//! # sim_risk (L4: Application)
//!
//! Risk analytics, the scenario catalogue, and the engine facade.
//!
//! This crate provides:
//! - Statistical reduction of sample sets: summary statistics, percentile
//!   confidence intervals, VaR/CVaR, convergence diagnostics (`analysis`)
//! - The read-only scenario registry with built-in presets (`scenarios`)
//! - The [`SimulationEngine`](engine::SimulationEngine) facade and the
//!   [`SimulationBackend`](backend::SimulationBackend) injection point
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             sim_risk (L4)               │
//! ├─────────────────────────────────────────┤
//! │  analysis/   - summary, intervals,     │
//! │                VaR/CVaR, convergence    │
//! │  scenarios/  - registry + presets      │
//! │  engine      - facade, request merge   │
//! │  backend     - injection trait         │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │            sim_engine (L3)              │
//! │  copula sampling, time series, RNG     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Failure semantics
//!
//! Every fallible operation returns `Result<_, EngineError>`. Errors are
//! never swallowed or replaced by defaults inside the engine: a missing
//! scenario, an out-of-bounds iteration count, or a caller-supplied
//! correlation matrix that is not positive semi-definite all surface to the
//! caller, who owns any placeholder behaviour.
//!
//! ## Concurrency
//!
//! The engine is stateless across calls and the registry is read-only
//! after construction, so a `SimulationEngine` may be shared freely across
//! threads without locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod backend;
pub mod engine;
pub mod error;
pub mod request;
pub mod result;
pub mod scenarios;

pub use backend::SimulationBackend;
pub use engine::SimulationEngine;
pub use error::EngineError;
pub use request::{LossSpec, ScenarioOverrides, SimulationRequest};
pub use result::SimulationResult;
