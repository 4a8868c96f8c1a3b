//! Atomically swappable hook table handle

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{HookLookup, HookTable};
use crate::types::HookDefinition;

/// Shared handle to the currently published [`HookTable`]
///
/// Cloning the handle shares the same slot. Readers hold the lock only long
/// enough to clone the inner `Arc`, so a slow request never blocks a swap and
/// a swap never tears a lookup.
#[derive(Debug, Clone, Default)]
pub struct SharedHookTable {
    current: Arc<RwLock<Arc<HookTable>>>,
}

impl SharedHookTable {
    /// Publish an initial table
    pub fn new(table: HookTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Snapshot of the published table
    pub fn current(&self) -> Arc<HookTable> {
        self.current.read().clone()
    }

    /// Replace the published table, returning the previous one
    pub fn swap(&self, table: HookTable) -> Arc<HookTable> {
        let next = Arc::new(table);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        debug!(previous = previous.len(), "Published new hook table");
        previous
    }

    /// Number of definitions in the published table
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Whether the published table is empty
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }
}

impl HookLookup for SharedHookTable {
    fn lookup(&self, id: &str) -> Option<Arc<HookDefinition>> {
        self.current().lookup(id)
    }
}
