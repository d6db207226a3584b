//! Engine registry for the available search front ends

use super::bing::Bing;
use super::duckduckgo::DuckDuckGo;
use super::traits::Engine;
use std::sync::Arc;
use tracing::warn;

/// Registry of search engines, kept in registration order
pub struct EngineRegistry {
    engines: Vec<Arc<dyn Engine>>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    /// Registry holding every built-in engine
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DuckDuckGo::new()));
        registry.register(Arc::new(Bing::new()));
        registry
    }

    /// Registry holding the named built-in engines, in the given order
    ///
    /// Unknown names are skipped with a warning.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let builtin = Self::with_defaults();
        let mut registry = Self::new();

        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            match builtin.get(&name) {
                Some(engine) if !registry.contains(&name) => registry.register(Arc::clone(engine)),
                Some(_) => {}
                None => warn!("Unknown search engine in settings: {}", name),
            }
        }

        registry
    }

    /// Register an engine, replacing one with the same name
    pub fn register(&mut self, engine: Arc<dyn Engine>) {
        match self.engines.iter().position(|e| e.name() == engine.name()) {
            Some(pos) => self.engines[pos] = engine,
            None => self.engines.push(engine),
        }
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Engine>> {
        self.engines.iter().find(|e| e.name() == name)
    }

    /// All engines in registration order
    pub fn engines(&self) -> &[Arc<dyn Engine>] {
        &self.engines
    }

    /// Get all engine names
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Check if an engine exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
