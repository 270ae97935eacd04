//! Scenario catalogue: templates, registry, and built-in presets.
//!
//! The registry is an explicit object constructed once and injected into
//! the engine facade — extension happens through
//! [`ScenarioRegistry::register_scenario`] during composition, never
//! through import-time side effects or ambient global state.

pub mod presets;
pub mod registry;
pub mod template;

pub use registry::ScenarioRegistry;
pub use template::ScenarioTemplate;
