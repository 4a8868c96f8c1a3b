//! Hook definition validation
//!
//! Parsing already guarantees field types; the checks here cover what serde
//! cannot express.

use crate::error::{HooksError, Result};
use crate::rules::TriggerRule;
use crate::types::{Argument, HookDefinition};

/// Validator for hook definitions
///
/// Rejects definitions that:
/// - have an empty `id` or `execute-command`
/// - carry a status code outside `100..=599`
/// - use a named source (header, url, payload, string) without a `name`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a single definition
    ///
    /// # Errors
    ///
    /// Returns [`HooksError::InvalidConfiguration`] naming the hook and field.
    pub fn validate_hook(hook: &HookDefinition) -> Result<()> {
        if hook.id.trim().is_empty() {
            return Err(HooksError::InvalidConfiguration(
                "Hook ID cannot be empty".to_string(),
            ));
        }

        if hook.execute_command.trim().is_empty() {
            return Err(HooksError::InvalidConfiguration(format!(
                "Hook '{}': execute-command cannot be empty",
                hook.id
            )));
        }

        if let Some(code) = hook.success_http_response_code {
            if !(100..=599).contains(&code) {
                return Err(HooksError::InvalidConfiguration(format!(
                    "Hook '{}': invalid success-http-response-code {}",
                    hook.id, code
                )));
            }
        }

        for argument in hook
            .pass_arguments_to_command
            .iter()
            .chain(hook.pass_environment_to_command.iter())
        {
            Self::validate_argument(&hook.id, argument)?;
        }

        if let Some(rule) = &hook.trigger_rule {
            Self::validate_rule(&hook.id, rule)?;
        }

        Ok(())
    }

    /// Validate every definition, stopping at the first failure
    pub fn validate_hooks(hooks: &[HookDefinition]) -> Result<()> {
        hooks.iter().try_for_each(Self::validate_hook)
    }

    fn validate_argument(hook_id: &str, argument: &Argument) -> Result<()> {
        if argument.source.requires_name() && argument.name.is_empty() {
            return Err(HooksError::InvalidConfiguration(format!(
                "Hook '{}': {:?} argument requires a name",
                hook_id, argument.source
            )));
        }
        Ok(())
    }

    fn validate_rule(hook_id: &str, rule: &TriggerRule) -> Result<()> {
        rule.leaves()
            .into_iter()
            .try_for_each(|leaf| Self::validate_argument(hook_id, leaf.parameter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArgumentSource;

    #[test]
    fn test_valid_hook() {
        let hook = HookDefinition::new("build", "make").with_argument(Argument::query("target"));
        assert!(ConfigValidator::validate_hook(&hook).is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(ConfigValidator::validate_hook(&HookDefinition::new(" ", "make")).is_err());
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = ConfigValidator::validate_hook(&HookDefinition::new("build", "")).unwrap_err();
        assert!(err.to_string().contains("build"));
    }

    #[test]
    fn test_status_code_range() {
        let mut hook = HookDefinition::new("build", "make");
        hook.success_http_response_code = Some(204);
        assert!(ConfigValidator::validate_hook(&hook).is_ok());
        hook.success_http_response_code = Some(99);
        assert!(ConfigValidator::validate_hook(&hook).is_err());
        hook.success_http_response_code = Some(600);
        assert!(ConfigValidator::validate_hook(&hook).is_err());
    }

    #[test]
    fn test_named_source_without_name_rejected() {
        let hook = HookDefinition::new("build", "make").with_argument(Argument::header(""));
        assert!(ConfigValidator::validate_hook(&hook).is_err());

        let hook = HookDefinition::new("build", "make")
            .with_argument(Argument::new(ArgumentSource::EntirePayload, ""));
        assert!(ConfigValidator::validate_hook(&hook).is_ok());
    }

    #[test]
    fn test_rule_parameters_are_checked() {
        let hook = HookDefinition::new("build", "make")
            .with_trigger_rule(TriggerRule::not(TriggerRule::value(Argument::payload(""), "x")));
        assert!(ConfigValidator::validate_hook(&hook).is_err());
    }
}
