use crate::{SecurityChecker, ToolAdapter};
use lintbridge_types::ToolIdentity;
use std::collections::BTreeMap;

/// Adapters keyed by identity, iterated in name order.
pub struct AdapterRegistry {
    adapters: BTreeMap<ToolIdentity, Box<dyn ToolAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: BTreeMap::new(),
        }
    }

    /// Registry with every adapter shipped in this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(SecurityChecker);
        registry
    }

    /// Register an adapter, returning the one it replaced (same identity), if any.
    pub fn register<A>(&mut self, adapter: A) -> Option<Box<dyn ToolAdapter>>
    where
        A: ToolAdapter + 'static,
    {
        self.adapters.insert(adapter.identity(), Box::new(adapter))
    }

    pub fn get(&self, name: &str) -> Option<&dyn ToolAdapter> {
        self.adapters.get(name).map(|adapter| adapter.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.keys().map(|id| id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ToolAdapter> {
        self.adapters.values().map(|adapter| adapter.as_ref())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.names())
            .finish()
    }
}
