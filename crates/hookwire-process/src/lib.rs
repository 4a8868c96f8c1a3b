//! # hookwire-process
//!
//! **Purpose**: Spawning the external commands hooks execute
//!
//! Runs a program with an argument list, working directory and extra
//! environment, waits for it and hands back its captured output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hookwire_process::{ProcessConfig, ProcessManager};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ProcessManager::new();
//!
//! let config = ProcessConfig::new("/var/scripts/redeploy.sh")
//!     .args(["main", "abc123"])
//!     .working_dir("/var/webhook")
//!     .env("HOOK_ref", "refs/heads/main");
//!
//! let output = manager.run(config).await?;
//! println!("{}", output.combined());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod output;

pub use config::ProcessConfig;
pub use error::{ProcessError, Result};
pub use manager::ProcessManager;
pub use output::CommandOutput;
