//! Name to factory mapping

use crate::command::CommandFactory;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registered command factories, keyed by exact command name
///
/// Filled during start-up, then shared read-only with the dispatcher.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<String, Arc<dyn CommandFactory>>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `factory` under `name`, replacing any earlier registration
    pub fn register<N, F>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: CommandFactory + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            warn!(command = %name, "replacing previously registered command");
        } else {
            debug!(command = %name, "registered command");
        }
    }

    /// Builder form of [`Registry::register`]
    #[must_use]
    pub fn with<N, F>(mut self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: CommandFactory + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Factory registered under `name`
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn CommandFactory>> {
        self.factories.get(name).cloned()
    }

    /// Whether a factory is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no command is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.names())
            .finish()
    }
}
