//! Engines compiled into this build, in preference order.

use super::ScriptEngine;

/// Constructor for a fresh engine instance.
pub type EngineFactory = fn() -> Box<dyn ScriptEngine>;

/// Name → factory table consulted by the selector.
///
/// Factories run lazily: an engine is only built when it is selected.
#[derive(Clone)]
pub struct EngineRegistry {
    engines: Vec<(&'static str, EngineFactory)>,
}

impl EngineRegistry {
    /// A registry with no engines at all.
    pub fn empty() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    /// Every engine compiled into this build.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "rhai")]
        registry.register(super::rhai::NAME, super::rhai::RhaiEngine::boxed);
        registry.register(super::sutra::NAME, super::sutra::SutraEngine::boxed);
        registry
    }

    /// Adds an engine, replacing any engine already registered under `name`.
    pub fn register(&mut self, name: &'static str, factory: EngineFactory) {
        match self.engines.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.engines.push((name, factory)),
        }
    }

    /// Builds a new instance of the named engine.
    pub fn get_engine_by_name(&self, name: &str) -> Option<Box<dyn ScriptEngine>> {
        self.engines
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, factory)| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.iter().any(|(existing, _)| *existing == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|(name, _)| *name).collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
