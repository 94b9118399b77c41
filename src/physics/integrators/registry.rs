//! Name resolution for configurable integrators
//!
//! The registry maps canonical names and aliases to [`IntegratorKind`]s so
//! that configuration files and the command line can refer to schemes by
//! name. Unknown names are always reported, never replaced by a default.

use std::collections::{BTreeSet, HashMap};

use super::IntegratorKind;
use crate::error::{Result, SimulationError};

#[derive(Debug, Clone)]
pub struct IntegratorRegistry {
    /// Maps names (canonical and aliases) to integrator kinds
    integrators: HashMap<String, IntegratorKind>,
}

impl IntegratorRegistry {
    /// Create an empty registry without any pre-registered integrators.
    pub fn new() -> Self {
        Self {
            integrators: HashMap::new(),
        }
    }

    /// Register every built-in scheme. Returns self for method chaining.
    pub fn with_standard_integrators(mut self) -> Self {
        for kind in IntegratorKind::ALL {
            self.register(kind);
        }
        self
    }

    pub fn with_integrator(mut self, kind: IntegratorKind) -> Self {
        self.register(kind);
        self
    }

    pub fn register(&mut self, kind: IntegratorKind) {
        self.integrators.insert(kind.name().to_string(), kind);
        for alias in kind.aliases() {
            self.integrators.insert(alias.to_string(), kind);
        }
    }

    /// Resolve a name or alias. Names are case-sensitive.
    pub fn create(&self, name: &str) -> Result<IntegratorKind> {
        self.integrators
            .get(name)
            .copied()
            .ok_or_else(|| SimulationError::UnknownIntegrator {
                name: name.to_string(),
                available: self.list_available(),
            })
    }

    /// Sorted canonical names
    pub fn list_available(&self) -> Vec<String> {
        self.integrators
            .values()
            .map(|kind| kind.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(alias, canonical)` pairs sorted by alias
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .integrators
            .iter()
            .filter(|(key, kind)| key.as_str() != kind.name())
            .map(|(key, kind)| (key.clone(), kind.name().to_string()))
            .collect();
        aliases.sort();
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
