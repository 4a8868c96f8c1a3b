//! Server error types
//!
//! Only startup can fail. Request handling has no error path: unknown ids
//! are a plain 404 and execution failures are logged by the executor.

use std::io;

use thiserror::Error;

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid server configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind the listen address
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Failed to set up the definitions file watcher
    #[error("Failed to watch hooks file: {0}")]
    Watch(#[from] notify::Error),

    /// Failed to install a signal handler
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] io::Error),

    /// Server IO error
    #[error("Server error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;
