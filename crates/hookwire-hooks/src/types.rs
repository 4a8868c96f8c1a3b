//! Core data types for hook definitions
//!
//! A [`HookDefinition`] is one named mapping from an HTTP-reachable identifier
//! to an external command. Definitions are deserialized from the hooks file
//! with kebab-case field names.
//!
//! # Examples
//!
//! ```ignore
//! [
//!   {
//!     "id": "redeploy",
//!     "execute-command": "/var/scripts/redeploy.sh",
//!     "command-working-directory": "/var/webhook",
//!     "response-message": "Redeploying",
//!     "pass-arguments-to-command": [
//!       { "source": "payload", "name": "head_commit.id" },
//!       { "source": "url", "name": "branch" }
//!     ]
//!   }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rules::TriggerRule;

/// A hook definition loaded from the definitions source
///
/// Definitions are immutable once a table holding them is published.
///
/// # Fields
///
/// * `id` - Identifier matched against the request path
/// * `execute_command` - Program to run when the hook triggers
/// * `command_working_directory` - Directory the program is spawned in
/// * `response_message` - Body returned to the caller on match
/// * `success_http_response_code` - Status returned on match (200 when absent)
/// * `trigger_rule` - Optional predicate; absent means always triggered
/// * `pass_arguments_to_command` - Ordered argument descriptors
/// * `pass_environment_to_command` - Descriptors exported as environment variables
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HookDefinition {
    /// Identifier used for path matching
    pub id: String,

    /// Program to execute
    pub execute_command: String,

    /// Working directory for the spawned program
    #[serde(default)]
    pub command_working_directory: Option<PathBuf>,

    /// Response body on match
    #[serde(default)]
    pub response_message: String,

    /// Response status on match
    #[serde(default)]
    pub success_http_response_code: Option<u16>,

    /// Optional trigger condition
    #[serde(default)]
    pub trigger_rule: Option<TriggerRule>,

    /// Arguments passed to the command, in order
    #[serde(default)]
    pub pass_arguments_to_command: Vec<Argument>,

    /// Values exported into the command environment
    #[serde(default)]
    pub pass_environment_to_command: Vec<Argument>,
}

impl HookDefinition {
    /// Create a definition with no rule, arguments or message
    pub fn new(id: impl Into<String>, execute_command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            execute_command: execute_command.into(),
            command_working_directory: None,
            response_message: String::new(),
            success_http_response_code: None,
            trigger_rule: None,
            pass_arguments_to_command: Vec::new(),
            pass_environment_to_command: Vec::new(),
        }
    }

    /// Set the response message
    pub fn with_response_message(mut self, message: impl Into<String>) -> Self {
        self.response_message = message.into();
        self
    }

    /// Set the working directory
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.command_working_directory = Some(dir.into());
        self
    }

    /// Set the trigger rule
    pub fn with_trigger_rule(mut self, rule: TriggerRule) -> Self {
        self.trigger_rule = Some(rule);
        self
    }

    /// Append a command argument descriptor
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.pass_arguments_to_command.push(argument);
        self
    }

    /// Append an environment descriptor
    pub fn with_environment(mut self, argument: Argument) -> Self {
        self.pass_environment_to_command.push(argument);
        self
    }

    /// Working directory, treating an empty path as unset
    pub fn working_directory(&self) -> Option<&Path> {
        self.command_working_directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Status code returned when this hook is matched
    pub fn response_status(&self) -> u16 {
        self.success_http_response_code.unwrap_or(200)
    }
}

/// Where an argument value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgumentSource {
    /// A request header, matched case-insensitively
    Header,

    /// A query string parameter
    #[serde(alias = "query")]
    Url,

    /// A field of the decoded body; dotted paths reach nested values
    Payload,

    /// The literal `name` itself
    String,

    /// The whole decoded body as JSON
    EntirePayload,

    /// All headers as a JSON object
    EntireHeaders,

    /// All query parameters as a JSON object
    EntireQuery,
}

impl ArgumentSource {
    /// Whether descriptors with this source must carry a `name`
    pub fn requires_name(&self) -> bool {
        matches!(
            self,
            ArgumentSource::Header
                | ArgumentSource::Url
                | ArgumentSource::Payload
                | ArgumentSource::String
        )
    }
}

/// Argument descriptor
///
/// Used for command arguments, environment values and trigger rule
/// parameters alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Source of the value
    pub source: ArgumentSource,

    /// Key, dotted path or literal, depending on the source
    #[serde(default)]
    pub name: String,

    /// Environment variable name when used in `pass-environment-to-command`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envname: Option<String>,
}

impl Argument {
    /// Create a descriptor
    pub fn new(source: ArgumentSource, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            envname: None,
        }
    }

    /// Header descriptor
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(ArgumentSource::Header, name)
    }

    /// Query parameter descriptor
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(ArgumentSource::Url, name)
    }

    /// Payload field descriptor
    pub fn payload(name: impl Into<String>) -> Self {
        Self::new(ArgumentSource::Payload, name)
    }

    /// Literal string descriptor
    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(ArgumentSource::String, value)
    }

    /// Set the environment variable name
    pub fn with_envname(mut self, envname: impl Into<String>) -> Self {
        self.envname = Some(envname.into());
        self
    }

    /// Environment variable name, defaulting to `HOOK_<name>`
    pub fn env_key(&self) -> String {
        match &self.envname {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("HOOK_{}", self.name),
        }
    }
}
