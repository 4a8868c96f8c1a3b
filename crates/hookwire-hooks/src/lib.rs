//! Hookwire hook definitions
//!
//! Everything the webhook server needs to decide what a request means:
//! hook definitions and their loader, the hot-swappable hook table, the
//! normalized request context, trigger rules and argument extraction.
//!
//! # Architecture
//!
//! 1. **Types** (`types`): Hook definitions and argument descriptors
//! 2. **Configuration** (`config`): Loading, validating and reloading the definitions file
//! 3. **Table** (`table`): Immutable snapshots behind an atomically swappable handle
//! 4. **Context** (`context`): Per-request headers, query and payload
//! 5. **Rules** (`rules`): Trigger rule grammar and evaluation
//! 6. **Params** (`params`): Command argument and environment extraction
//!
//! # Quick Start
//!
//! ```ignore
//! use hookwire_hooks::{HookLookup, HookReloader, SharedHookTable};
//!
//! let table = SharedHookTable::default();
//! let reloader = HookReloader::new("hooks.json", table.clone());
//! reloader.reload()?;
//!
//! if let Some(hook) = table.lookup("redeploy") {
//!     println!("{} runs {}", hook.id, hook.execute_command);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Definitions file
//!
//! ```yaml
//! - id: redeploy
//!   execute-command: /var/scripts/redeploy.sh
//!   response-message: Redeploying
//!   trigger-rule:
//!     match:
//!       type: value
//!       value: refs/heads/main
//!       parameter:
//!         source: payload
//!         name: ref
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod params;
pub mod rules;
pub mod table;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, HookReloader};
pub use context::{ParameterMap, RequestContext};
pub use error::{HooksError, Result};
pub use params::{extract_arguments, extract_environment, extract_parameter};
pub use rules::{Evaluate, MatchRule, Pattern, TriggerRule};
pub use table::{HookLookup, HookTable, SharedHookTable};
pub use types::{Argument, ArgumentSource, HookDefinition};
