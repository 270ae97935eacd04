//! The simulation backend injection point.
//!
//! Calling layers depend on [`SimulationBackend`] and receive a concrete
//! implementation at composition time. This replaces any "try to import
//! the real engine, else fall back to a mock" runtime probing: a host that
//! wants a stub writes one against this trait and wires it in explicitly,
//! and the decision to substitute placeholder output on failure belongs
//! entirely to that host, never to the engine.

use crate::error::EngineError;
use crate::request::SimulationRequest;
use crate::result::SimulationResult;
use crate::SimulationEngine;

/// A simulation provider chosen at composition time.
pub trait SimulationBackend {
    /// Runs a custom simulation request.
    fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, EngineError>;

    /// Lists the scenario names this backend can resolve.
    fn available_scenarios(&self) -> Vec<String>;
}

impl SimulationBackend for SimulationEngine {
    fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, EngineError> {
        self.run_custom_simulation(request)
    }

    fn available_scenarios(&self) -> Vec<String> {
        self.list_available_scenarios()
    }
}
