//! The scenario registry.
//!
//! An explicit, injectable catalogue: constructed once during composition,
//! read-only afterwards. [`register_scenario`](ScenarioRegistry::register_scenario)
//! is the only mutation path and is intended for startup wiring, never for
//! request-time extension. There is no ambient global catalogue.

use std::collections::BTreeMap;

use super::presets;
use super::template::ScenarioTemplate;
use crate::error::EngineError;

/// Read-only catalogue of named scenario templates.
#[derive(Clone, Debug, Default)]
pub struct ScenarioRegistry {
    templates: BTreeMap<String, ScenarioTemplate>,
}

impl ScenarioRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the built-in presets.
    pub fn with_builtin_presets() -> Self {
        let mut registry = Self::new();
        for template in presets::builtin() {
            // Preset names are distinct; the preset suite asserts this
            registry
                .register_scenario(template)
                .expect("built-in preset names are unique");
        }
        registry
    }

    /// Registers a template under its own name.
    ///
    /// # Errors
    ///
    /// `ScenarioAlreadyRegistered` if the name is taken; existing entries
    /// are never replaced.
    pub fn register_scenario(&mut self, template: ScenarioTemplate) -> Result<(), EngineError> {
        let name = template.name().to_string();
        if self.templates.contains_key(&name) {
            return Err(EngineError::ScenarioAlreadyRegistered { name });
        }
        self.templates.insert(name, template);
        Ok(())
    }

    /// Looks up a template by name.
    ///
    /// # Errors
    ///
    /// `ScenarioNotFound` carrying the available names; the engine never
    /// substitutes a default scenario.
    pub fn get(&self, name: &str) -> Result<&ScenarioTemplate, EngineError> {
        self.templates
            .get(name)
            .ok_or_else(|| EngineError::ScenarioNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Returns the number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when no templates are registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
