//! Command-line configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::error::{ServerError, ServerResult};

/// Command-line arguments for the `hookwire` binary
///
/// Every flag can also be set through a `HOOKWIRE_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "hookwire", version, about = "Run commands in response to incoming webhooks")]
pub struct ServerArgs {
    /// IP address to listen on
    #[arg(long, env = "HOOKWIRE_IP", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub ip: IpAddr,

    /// Port to listen on
    #[arg(long, env = "HOOKWIRE_PORT", default_value_t = 9000)]
    pub port: u16,

    /// Path to the JSON or YAML file holding hook definitions
    #[arg(long, env = "HOOKWIRE_HOOKS", default_value = "hooks.json")]
    pub hooks: PathBuf,

    /// URL prefix hooks are served under (empty serves them at the root)
    #[arg(long, env = "HOOKWIRE_URLPREFIX", default_value = "hooks")]
    pub urlprefix: String,

    /// Reload the hooks file whenever it changes
    #[arg(long, env = "HOOKWIRE_HOTRELOAD")]
    pub hotreload: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, env = "HOOKWIRE_VERBOSE")]
    pub verbose: bool,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub addr: SocketAddr,
    /// Definitions file
    pub hooks_path: PathBuf,
    /// URL prefix without surrounding slashes
    pub url_prefix: String,
    /// Whether the definitions file is watched
    pub hot_reload: bool,
    /// Debug logging
    pub verbose: bool,
}

impl ServerConfig {
    /// Configuration serving `hooks_path` on `addr` under `/hooks`
    pub fn new(addr: SocketAddr, hooks_path: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            hooks_path: hooks_path.into(),
            url_prefix: "hooks".to_string(),
            hot_reload: false,
            verbose: false,
        }
    }

    /// Set the URL prefix
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = normalize_prefix(&prefix.into());
        self
    }

    /// Enable or disable hot reload
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload = enabled;
        self
    }

    /// Reject prefixes the router cannot express
    pub fn validate(&self) -> ServerResult<()> {
        if self
            .url_prefix
            .chars()
            .any(|c| matches!(c, '{' | '}' | '*' | '?' | '#'))
        {
            return Err(ServerError::InvalidConfig(format!(
                "URL prefix '{}' contains reserved characters",
                self.url_prefix
            )));
        }
        if self.url_prefix.split('/').any(str::is_empty) && !self.url_prefix.is_empty() {
            return Err(ServerError::InvalidConfig(format!(
                "URL prefix '{}' contains an empty segment",
                self.url_prefix
            )));
        }
        Ok(())
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            addr: SocketAddr::new(args.ip, args.port),
            hooks_path: args.hooks,
            url_prefix: normalize_prefix(&args.urlprefix),
            hot_reload: args.hotreload,
            verbose: args.verbose,
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_matches('/').to_string()
}
