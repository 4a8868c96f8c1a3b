//! Hook table and its shared, swappable handle
//!
//! A [`HookTable`] is an immutable, ordered snapshot of loaded definitions.
//! The server never mutates a published table: reloading builds a new one and
//! swaps it into the [`SharedHookTable`] in a single step, so every lookup
//! observes either the old set or the new set in full.
//!
//! # Examples
//!
//! ```ignore
//! use hookwire_hooks::{HookDefinition, HookLookup, HookTable, SharedHookTable};
//!
//! let shared = SharedHookTable::new(HookTable::new(vec![
//!     HookDefinition::new("deploy", "/bin/deploy"),
//! ]));
//! assert!(shared.lookup("deploy").is_some());
//!
//! shared.swap(HookTable::empty());
//! assert!(shared.lookup("deploy").is_none());
//! ```

pub mod shared;

pub use shared::SharedHookTable;

use std::{path::Path, sync::Arc};

use crate::{config::ConfigLoader, error::Result, types::HookDefinition};

/// Lookup of hook definitions by id
///
/// Implementations must be thread-safe (`Send + Sync`); the dispatcher calls
/// `lookup` concurrently from every request task.
pub trait HookLookup: Send + Sync {
    /// First definition whose id equals `id`
    fn lookup(&self, id: &str) -> Option<Arc<HookDefinition>>;
}

/// Immutable ordered collection of hook definitions
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    hooks: Vec<Arc<HookDefinition>>,
}

impl HookTable {
    /// Build a table preserving definition order
    pub fn new(hooks: Vec<HookDefinition>) -> Self {
        Self {
            hooks: hooks.into_iter().map(Arc::new).collect(),
        }
    }

    /// Table with no definitions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a table from a definitions file
    ///
    /// # Errors
    ///
    /// Propagates any read, parse or validation failure from [`ConfigLoader`].
    pub fn load(path: &Path) -> Result<Self> {
        ConfigLoader::load_from_path(path).map(Self::new)
    }

    /// Number of definitions, duplicates included
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the table has no definitions
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Ids in definition order
    pub fn ids(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.id.as_str()).collect()
    }

    /// Iterate over definitions in order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<HookDefinition>> {
        self.hooks.iter()
    }
}

impl HookLookup for HookTable {
    fn lookup(&self, id: &str) -> Option<Arc<HookDefinition>> {
        self.hooks.iter().find(|hook| hook.id == id).cloned()
    }
}
