#![warn(missing_docs)]

//! Hookwire webhook server
//!
//! Serves `/{prefix}/{id}` for any HTTP method. A request whose id names a
//! hook in the live table gets that hook's response message straight away;
//! evaluating the trigger rule and running the command happen afterwards on a
//! detached task. The table is reloaded when the definitions file changes or
//! the process receives `SIGUSR1`.

pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod watch;

pub use config::{ServerArgs, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use executor::{prepare_command, CommandExecutor, ExecutionOutcome, HookExecutor};
pub use routes::build_router;
pub use server::HookServer;
pub use state::AppState;
