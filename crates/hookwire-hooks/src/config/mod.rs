//! Hook definition loading
//!
//! The definitions source is a single JSON or YAML file holding a sequence of
//! hook definitions. [`ConfigLoader`] reads and parses it, [`ConfigValidator`]
//! rejects unusable definitions and [`HookReloader`] publishes freshly loaded
//! tables into a [`SharedHookTable`](crate::table::SharedHookTable).

pub mod loader;
pub mod reloader;
pub mod validator;

pub use loader::ConfigLoader;
pub use reloader::HookReloader;
pub use validator::ConfigValidator;
