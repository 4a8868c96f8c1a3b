//! Error types for process management

use std::io;

use thiserror::Error;

/// Process management errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process
    #[error("Failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Failed while waiting for the process or reading its output
    #[error("Failed to wait for process: {0}")]
    WaitFailed(#[from] io::Error),

    /// Process ran but exited unsuccessfully
    #[error("Process exited with {status}")]
    Exited {
        status: std::process::ExitStatus,
        output: String,
    },

    /// Invalid configuration
    #[error("Invalid process configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
