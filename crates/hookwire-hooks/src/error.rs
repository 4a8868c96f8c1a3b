//! Error types for the hooks crate
//!
//! Every failure here belongs to the load family: a definitions source that
//! cannot be read, parsed or validated. Callers that hit one of these during a
//! reload keep serving the previously published table.
//!
//! # Examples
//!
//! ```ignore
//! match HookTable::load(&path) {
//!     Ok(table) => shared.swap(table),
//!     Err(HooksError::InvalidConfiguration(msg)) => eprintln!("bad hooks file: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while loading hook definitions
#[derive(Debug, Error)]
pub enum HooksError {
    /// Invalid hook configuration
    ///
    /// The source parsed but a definition is unusable. The string names the
    /// offending hook and field.
    #[error("Invalid hook configuration: {0}")]
    InvalidConfiguration(String),

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    ///
    /// The definitions source is missing or unreadable.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for hooks operations
pub type Result<T> = std::result::Result<T, HooksError>;
