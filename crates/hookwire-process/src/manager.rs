//! Process manager - spawn, wait and capture

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    config::ProcessConfig,
    error::{ProcessError, Result},
    output::CommandOutput,
};

/// Runs configured processes to completion
#[derive(Debug, Clone, Copy)]
pub struct ProcessManager;

impl ProcessManager {
    /// Create new process manager
    pub fn new() -> Self {
        Self
    }

    /// Spawn a process and wait for it, capturing stdout and stderr
    ///
    /// A non-zero exit is not an error here; inspect
    /// [`CommandOutput::success`] or call [`CommandOutput::into_result`].
    /// No timeout is applied.
    ///
    /// # Examples
    /// ```no_run
    /// use hookwire_process::{ProcessManager, ProcessConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ProcessManager::new();
    /// let config = ProcessConfig::new("echo").args(["hello"]);
    /// let output = manager.run(config).await?;
    /// assert_eq!(output.stdout, "hello\n");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, config: ProcessConfig) -> Result<CommandOutput> {
        if config.command.trim().is_empty() {
            return Err(ProcessError::InvalidConfig(
                "command cannot be empty".to_string(),
            ));
        }

        debug!(
            command = %config.command,
            args = ?config.args,
            working_dir = ?config.working_dir,
            "Spawning process"
        );

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: config.command.clone(),
            source,
        })?;

        if let Some(pid) = child.id() {
            info!(pid = %pid, command = %config.command, "Process spawned");
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput::from_std(output))
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_echo() {
        let manager = ProcessManager::new();
        let output = manager
            .run(ProcessConfig::new("echo").args(["hello", "world"]))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "hello world\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_working_dir_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().canonicalize().unwrap();

        let output = ProcessManager::new()
            .run(
                ProcessConfig::new("sh")
                    .args(["-c", "pwd -P; echo \"$HOOK_msg\""])
                    .working_dir(dir.path())
                    .env("HOOK_msg", "hi"),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, format!("{}\nhi\n", expected.display()));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported_in_output() {
        let output = ProcessManager::new()
            .run(ProcessConfig::new("sh").args(["-c", "echo oops >&2; exit 3"]))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.combined(), "oops\n");
        assert!(matches!(
            output.into_result(),
            Err(ProcessError::Exited { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let result = ProcessManager::new()
            .run(ProcessConfig::new("/nonexistent/hookwire-test-binary"))
            .await;
        assert!(matches!(result, Err(ProcessError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_missing_working_dir_fails_to_spawn() {
        let result = ProcessManager::new()
            .run(ProcessConfig::new("echo").working_dir("/nonexistent/hookwire-dir"))
            .await;
        assert!(matches!(result, Err(ProcessError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let result = ProcessManager::new().run(ProcessConfig::new(" ")).await;
        assert!(matches!(result, Err(ProcessError::InvalidConfig(_))));
    }
}
