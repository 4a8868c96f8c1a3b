//! Hook execution engine
//!
//! Runs off the request path on a detached task. For a matched hook it
//! evaluates the trigger rule, extracts the argument list and environment,
//! then spawns the command and logs what it printed. Nothing here reports back
//! to the HTTP caller.

use std::sync::Arc;

use async_trait::async_trait;
use hookwire_hooks::{
    extract_arguments, extract_environment, Evaluate, HookDefinition, RequestContext,
};
use hookwire_process::{CommandOutput, ProcessConfig, ProcessError, ProcessManager};
use tracing::{debug, error, info};

/// Result of handing one matched request to an executor
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The trigger rule evaluated false
    NotTriggered,
    /// The command ran and exited successfully
    Completed(CommandOutput),
    /// The command could not be spawned or exited unsuccessfully
    Failed(ProcessError),
}

/// Runs matched hooks
///
/// Implementations must be thread-safe (`Send + Sync`); one executor is shared
/// by every request task.
#[async_trait]
pub trait HookExecutor: Send + Sync {
    /// Evaluate and, when triggered, execute `hook` for one request
    ///
    /// Owns `context` from here on; the request task never touches it again.
    async fn execute(&self, hook: Arc<HookDefinition>, context: RequestContext) -> ExecutionOutcome;
}

/// Build the process configuration for a triggered hook
///
/// Returns `None` when the hook's trigger rule does not hold. A hook with no
/// rule always triggers.
pub fn prepare_command(hook: &HookDefinition, context: &RequestContext) -> Option<ProcessConfig> {
    if let Some(rule) = &hook.trigger_rule {
        if !rule.evaluate(context) {
            return None;
        }
    }

    let mut config = ProcessConfig::new(hook.execute_command.clone())
        .args(extract_arguments(hook, context))
        .envs(extract_environment(hook, context));
    if let Some(dir) = hook.working_directory() {
        config = config.working_dir(dir);
    }
    Some(config)
}

/// Executor that spawns the hook's command as a child process
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    manager: ProcessManager,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new() -> Self {
        Self {
            manager: ProcessManager::new(),
        }
    }
}

#[async_trait]
impl HookExecutor for CommandExecutor {
    async fn execute(&self, hook: Arc<HookDefinition>, context: RequestContext) -> ExecutionOutcome {
        let Some(config) = prepare_command(&hook, &context) else {
            info!(hook_id = %hook.id, "Hook got matched, but didn't get triggered because the trigger rules were not satisfied");
            return ExecutionOutcome::NotTriggered;
        };
        drop(context);

        info!(
            hook_id = %hook.id,
            command = %config.command,
            args = ?config.args,
            working_dir = ?config.working_dir,
            "Executing hook command"
        );
        debug!(hook_id = %hook.id, env = ?config.env, "Hook command environment");

        let command = config.command.clone();
        let args = config.args.clone();
        match self.manager.run(config).await.and_then(CommandOutput::into_result) {
            Ok(output) => {
                info!(
                    hook_id = %hook.id,
                    command = %command,
                    output = %output.combined(),
                    "Command finished"
                );
                ExecutionOutcome::Completed(output)
            }
            Err(err) => {
                match &err {
                    ProcessError::Exited { status, output } => error!(
                        hook_id = %hook.id,
                        command = %command,
                        args = ?args,
                        status = %status,
                        output = %output,
                        "Command exited unsuccessfully"
                    ),
                    other => error!(
                        hook_id = %hook.id,
                        command = %command,
                        args = ?args,
                        error = %other,
                        "Error occurred while executing the hook's command"
                    ),
                }
                ExecutionOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hookwire_hooks::{Argument, TriggerRule};

    use super::*;

    fn context(query: &str) -> RequestContext {
        RequestContext::from_parts(Vec::<(&str, &str)>::new(), Some(query), Vec::new())
    }

    #[test]
    fn test_prepare_without_rule_always_triggers() {
        let hook = HookDefinition::new("build", "echo")
            .with_working_directory("/tmp")
            .with_argument(Argument::query("msg"))
            .with_environment(Argument::query("msg").with_envname("MSG"));

        let config = prepare_command(&hook, &context("msg=hi")).unwrap();
        assert_eq!(config.command, "echo");
        assert_eq!(config.args, vec!["hi"]);
        assert_eq!(config.env, vec![("MSG".to_string(), "hi".to_string())]);
        assert_eq!(config.working_dir, Some("/tmp".into()));
    }

    #[test]
    fn test_prepare_respects_rule() {
        let hook = HookDefinition::new("build", "echo")
            .with_trigger_rule(TriggerRule::value(Argument::query("branch"), "main"));

        assert!(prepare_command(&hook, &context("branch=main")).is_some());
        assert!(prepare_command(&hook, &context("branch=dev")).is_none());
        assert!(prepare_command(&hook, &context("")).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_echo() {
        let hook = Arc::new(HookDefinition::new("build", "echo").with_argument(Argument::query("msg")));
        let outcome = CommandExecutor::new().execute(hook, context("msg=hi")).await;
        match outcome {
            ExecutionOutcome::Completed(output) => assert_eq!(output.stdout, "hi\n"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_reports_failures() {
        let hook = Arc::new(HookDefinition::new("fail", "false"));
        let outcome = CommandExecutor::new().execute(hook, context("")).await;
        assert!(matches!(outcome, ExecutionOutcome::Failed(ProcessError::Exited { .. })));

        let hook = Arc::new(HookDefinition::new("missing", "/nonexistent/hookwire-cmd"));
        let outcome = CommandExecutor::new().execute(hook, context("")).await;
        assert!(matches!(outcome, ExecutionOutcome::Failed(ProcessError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_execute_not_triggered() {
        let hook = Arc::new(
            HookDefinition::new("guarded", "/nonexistent/hookwire-cmd")
                .with_trigger_rule(TriggerRule::or(vec![])),
        );
        let outcome = CommandExecutor::new().execute(hook, context("")).await;
        assert!(matches!(outcome, ExecutionOutcome::NotTriggered));
    }
}
