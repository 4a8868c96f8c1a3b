//! `hookwire` binary

use std::sync::Arc;

use clap::Parser;
use hookwire_server::{CommandExecutor, HookServer, ServerArgs, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(ServerArgs::parse());

    let directives = if config.verbose {
        "info,hookwire=debug,hookwire_server=debug,hookwire_hooks=debug,hookwire_process=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)),
        )
        .with_target(false)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting hookwire");

    let server = HookServer::new(config, Arc::new(CommandExecutor::new()))?;
    server.run().await?;

    Ok(())
}
