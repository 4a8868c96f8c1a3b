//! Application state for the hook server

use std::sync::Arc;

use hookwire_hooks::{HookDefinition, RequestContext, SharedHookTable};
use tokio::task::JoinHandle;

use crate::executor::{ExecutionOutcome, HookExecutor};

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    /// Live hook table, swapped by the reload triggers
    pub table: SharedHookTable,
    /// Engine that runs matched hooks
    pub executor: Arc<dyn HookExecutor>,
}

impl AppState {
    /// Create new application state
    pub fn new(table: SharedHookTable, executor: Arc<dyn HookExecutor>) -> Self {
        Self { table, executor }
    }

    /// Hand a matched hook to the executor on a detached task
    ///
    /// The returned handle may be dropped; the task keeps running.
    pub fn dispatch(
        &self,
        hook: Arc<HookDefinition>,
        context: RequestContext,
    ) -> JoinHandle<ExecutionOutcome> {
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move { executor.execute(hook, context).await })
    }
}
