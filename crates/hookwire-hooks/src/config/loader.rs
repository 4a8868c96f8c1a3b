//! Definitions file loader
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
//! JSON. The document root must be a sequence of hook definitions.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::validator::ConfigValidator;
use crate::error::Result;
use crate::types::HookDefinition;

/// Loader for hook definition files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate every definition in a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// an invalid definition. A missing file is an error.
    pub fn load_from_path(path: &Path) -> Result<Vec<HookDefinition>> {
        let content = fs::read_to_string(path)?;
        let hooks = if Self::is_yaml(path) {
            Self::parse_yaml(&content)?
        } else {
            Self::parse_json(&content)?
        };

        ConfigValidator::validate_hooks(&hooks)?;
        Self::warn_duplicate_ids(&hooks);

        debug!(path = %path.display(), count = hooks.len(), "Parsed hook definitions");
        Ok(hooks)
    }

    /// Parse a JSON definitions document
    pub fn parse_json(content: &str) -> Result<Vec<HookDefinition>> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a YAML definitions document
    ///
    /// Rule variants are written as single-key maps (`and: [...]`), not YAML tags.
    pub fn parse_yaml(content: &str) -> Result<Vec<HookDefinition>> {
        Ok(serde_yaml::with::singleton_map_recursive::deserialize(
            serde_yaml::Deserializer::from_str(content),
        )?)
    }

    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        )
    }

    // Only the first definition with a given id is reachable.
    fn warn_duplicate_ids(hooks: &[HookDefinition]) {
        for (index, hook) in hooks.iter().enumerate() {
            if hooks[..index].iter().any(|earlier| earlier.id == hook.id) {
                warn!(hook_id = %hook.id, "Duplicate hook id, only the first definition is reachable");
            }
        }
    }
}
