//! Reload triggers
//!
//! Two independent listeners feed the same reload routine: a filesystem
//! watcher on the definitions file and a `SIGUSR1` handler. Each reload runs
//! on the blocking pool and either publishes a complete new table or leaves
//! the current one serving.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hookwire_hooks::HookReloader;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{ServerError, ServerResult};

/// Window in which bursts of file events collapse into one reload
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Reload the table on the blocking pool
///
/// Failures are logged by the reloader; this never fails.
pub async fn reload(reloader: &HookReloader, trigger: &'static str) {
    info!(trigger, path = %reloader.path().display(), "Reload requested");
    let reloader = reloader.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || reloader.reload()).await {
        error!(trigger, error = %e, "Reload task failed");
    }
}

/// Running filesystem watcher
///
/// Dropping it stops the watch.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl FileWatcher {
    /// Whether the reload loop is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Watch the reloader's definitions file and reload on writes
///
/// The parent directory is watched so that editors replacing the file by
/// rename are seen too.
///
/// # Errors
///
/// Fails if the watcher cannot be created or the directory cannot be watched.
pub fn watch_file(reloader: HookReloader) -> ServerResult<FileWatcher> {
    let path = reloader.path().to_path_buf();
    let file_name: OsString = path
        .file_name()
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ServerError::InvalidConfig(format!("hooks path '{}' has no file name", path.display()))
        })?;
    let dir = watch_dir(&path);

    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if ours && is_write_event(&event.kind) {
                    debug!(kind = ?event.kind, "Hooks file changed");
                    let _ = tx.send(());
                }
            }
            Err(e) => {
                error!(error = %e, "File watching error");
            }
        },
        notify::Config::default(),
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "Watching hooks file for changes");

    let task = tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tokio::time::sleep(DEBOUNCE).await;
            while rx.try_recv().is_ok() {}
            reload(&reloader, "file change").await;
        }
        debug!("File watcher stopped");
    });

    Ok(FileWatcher {
        _watcher: watcher,
        task,
    })
}

/// Reload whenever the process receives `SIGUSR1`
///
/// # Errors
///
/// Fails if the signal handler cannot be installed.
#[cfg(unix)]
pub fn watch_signal(reloader: HookReloader) -> ServerResult<Option<JoinHandle<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut signals = signal(SignalKind::user_defined1()).map_err(ServerError::Signal)?;
    info!(pid = std::process::id(), "Send SIGUSR1 to reload hooks");

    Ok(Some(tokio::spawn(async move {
        while signals.recv().await.is_some() {
            reload(&reloader, "SIGUSR1").await;
        }
        warn!("Signal stream closed, SIGUSR1 reloads disabled");
    })))
}

/// Signal reloads are unavailable on this platform
#[cfg(not(unix))]
pub fn watch_signal(_reloader: HookReloader) -> ServerResult<Option<JoinHandle<()>>> {
    debug!("Signal reloads not supported on this platform");
    Ok(None)
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Name(_))
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}
