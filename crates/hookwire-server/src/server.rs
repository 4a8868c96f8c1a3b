//! Hook server bootstrap
//!
//! Loads the initial table, starts the reload triggers and serves the router
//! until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use hookwire_hooks::{HookReloader, SharedHookTable};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    executor::HookExecutor,
    routes::build_router,
    state::AppState,
    watch,
};

/// Webhook server
pub struct HookServer {
    config: ServerConfig,
    table: SharedHookTable,
    reloader: HookReloader,
    executor: Arc<dyn HookExecutor>,
}

impl HookServer {
    /// Create a server with an empty table
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: ServerConfig, executor: Arc<dyn HookExecutor>) -> ServerResult<Self> {
        config.validate()?;
        let table = SharedHookTable::default();
        let reloader = HookReloader::new(&config.hooks_path, table.clone());

        Ok(Self {
            config,
            table,
            reloader,
            executor,
        })
    }

    /// The live hook table
    pub fn table(&self) -> &SharedHookTable {
        &self.table
    }

    /// The reloader publishing into [`Self::table`]
    pub fn reloader(&self) -> &HookReloader {
        &self.reloader
    }

    /// Load the definitions file into the table
    ///
    /// A failed load leaves the table empty; the server still starts.
    pub fn load_initial(&self) -> usize {
        match self.reloader.reload() {
            Ok(count) => {
                for id in self.table.current().ids() {
                    info!(hook_id = %id, "Loaded hook");
                }
                count
            }
            Err(_) => {
                warn!(
                    path = %self.config.hooks_path.display(),
                    "Couldn't load hooks from file, serving with no hooks"
                );
                0
            }
        }
    }

    /// Router serving the live table
    pub fn router(&self) -> Router {
        build_router(
            AppState::new(self.table.clone(), Arc::clone(&self.executor)),
            &self.config.url_prefix,
        )
    }

    /// Bind the configured address and serve until ctrl-c or SIGTERM
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Fails if hot reload was requested and the watcher cannot be set up, or
    /// if the listener fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.load_initial();

        let file_watcher = if self.config.hot_reload {
            Some(watch::watch_file(self.reloader.clone())?)
        } else {
            None
        };

        let signal_task = match watch::watch_signal(self.reloader.clone()) {
            Ok(task) => task,
            Err(e) => {
                error!(error = %e, "Signal reloads unavailable");
                None
            }
        };

        let prefix = if self.config.url_prefix.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", self.config.url_prefix)
        };
        info!(address = %listener.local_addr()?, prefix = %prefix, "Serving hooks");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(task) = signal_task {
            task.abort();
        }
        drop(file_watcher);
        info!("Server stopped");
        Ok(())
    }
}

/// Resolves on ctrl-c, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
