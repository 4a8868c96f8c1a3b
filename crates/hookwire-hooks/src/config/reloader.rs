//! Reloading the definitions file into a shared table
//!
//! A reload either publishes a complete new table or leaves the current one in
//! place. Triggers (file watchers, signals) live in the server; this type only
//! knows how to load and swap.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::Result;
use crate::table::{HookTable, SharedHookTable};

/// Loads a definitions file and publishes it into a [`SharedHookTable`]
#[derive(Debug, Clone)]
pub struct HookReloader {
    path: PathBuf,
    table: SharedHookTable,
}

impl HookReloader {
    /// Create a reloader for `path` publishing into `table`
    pub fn new(path: impl Into<PathBuf>, table: SharedHookTable) -> Self {
        Self {
            path: path.into(),
            table,
        }
    }

    /// Path of the definitions file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle receiving new tables
    pub fn table(&self) -> &SharedHookTable {
        &self.table
    }

    /// Reload the file and publish it
    ///
    /// Returns the number of definitions now published. On failure the
    /// previously published table stays in effect.
    ///
    /// # Errors
    ///
    /// Propagates the load error after logging it.
    pub fn reload(&self) -> Result<usize> {
        info!(path = %self.path.display(), "Reloading hooks");

        match HookTable::load(&self.path) {
            Ok(table) => {
                let count = table.len();
                let ids: Vec<String> = table.ids().into_iter().map(str::to_string).collect();
                self.table.swap(table);
                info!(path = %self.path.display(), count, ids = ?ids, "Hooks reloaded");
                Ok(count)
            }
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reload hooks, keeping previous definitions"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::table::HookLookup;

    #[test]
    fn test_reload_publishes_new_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hooks.json");
        fs::write(&path, r#"[{"id": "a", "execute-command": "echo"}]"#).unwrap();

        let reloader = HookReloader::new(&path, SharedHookTable::default());
        assert_eq!(reloader.reload().unwrap(), 1);
        assert!(reloader.table().lookup("a").is_some());

        fs::write(&path, r#"[{"id": "b", "execute-command": "echo"}]"#).unwrap();
        reloader.reload().unwrap();
        assert!(reloader.table().lookup("a").is_none());
        assert!(reloader.table().lookup("b").is_some());
    }

    #[test]
    fn test_failed_reload_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hooks.json");
        fs::write(&path, r#"[{"id": "a", "execute-command": "echo"}]"#).unwrap();

        let reloader = HookReloader::new(&path, SharedHookTable::default());
        reloader.reload().unwrap();

        fs::write(&path, "[{ not json").unwrap();
        assert!(reloader.reload().is_err());
        assert!(reloader.table().lookup("a").is_some());

        fs::remove_file(&path).unwrap();
        assert!(reloader.reload().is_err());
        assert!(reloader.table().lookup("a").is_some());
    }
}
