//! Parameter lookup and argument extraction
//!
//! Resolves [`Argument`] descriptors against a [`RequestContext`]. Names may be
//! dotted paths (`head_commit.author.name`, `commits.0.id`) that walk nested
//! objects and array indices.
//!
//! # Examples
//!
//! ```ignore
//! let hook = HookDefinition::new("build", "echo").with_argument(Argument::query("msg"));
//! let context = RequestContext::from_parts(Vec::<(&str, &str)>::new(), Some("msg=hi"), vec![]);
//! assert_eq!(extract_arguments(&hook, &context), vec!["hi".to_string()]);
//! ```

use serde_json::Value;
use tracing::warn;

use crate::{
    context::{ParameterMap, RequestContext},
    types::{Argument, ArgumentSource, HookDefinition},
};

/// Look up a dotted path in a parameter map
pub fn lookup_path<'a>(map: &'a ParameterMap, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let mut parts = path.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(object) => object.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a JSON value the way it is passed to commands
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolve one descriptor to its string form
///
/// Returns `None` when the source has no such value.
pub fn extract_parameter(argument: &Argument, context: &RequestContext) -> Option<String> {
    match argument.source {
        ArgumentSource::Header => {
            lookup_path(&context.headers, &argument.name.to_ascii_lowercase())
                .map(value_to_string)
        }
        ArgumentSource::Url => lookup_path(&context.query, &argument.name).map(value_to_string),
        ArgumentSource::Payload => context
            .payload
            .as_ref()
            .and_then(|payload| lookup_path(payload, &argument.name))
            .map(value_to_string),
        ArgumentSource::String => Some(argument.name.clone()),
        ArgumentSource::EntirePayload => context
            .payload
            .as_ref()
            .map(|payload| Value::Object(payload.clone()).to_string()),
        ArgumentSource::EntireHeaders => Some(Value::Object(context.headers.clone()).to_string()),
        ArgumentSource::EntireQuery => Some(Value::Object(context.query.clone()).to_string()),
    }
}

/// Build the ordered command argument list for a hook
///
/// Missing values become empty strings so positional arguments stay aligned.
pub fn extract_arguments(hook: &HookDefinition, context: &RequestContext) -> Vec<String> {
    hook.pass_arguments_to_command
        .iter()
        .map(|argument| {
            extract_parameter(argument, context).unwrap_or_else(|| {
                warn!(
                    hook_id = %hook.id,
                    source = ?argument.source,
                    name = %argument.name,
                    "Couldn't retrieve argument, passing empty string"
                );
                String::new()
            })
        })
        .collect()
}

/// Build the extra environment for a hook's command
///
/// Missing values are skipped.
pub fn extract_environment(hook: &HookDefinition, context: &RequestContext) -> Vec<(String, String)> {
    hook.pass_environment_to_command
        .iter()
        .filter_map(|argument| match extract_parameter(argument, context) {
            Some(value) => Some((argument.env_key(), value)),
            None => {
                warn!(
                    hook_id = %hook.id,
                    source = ?argument.source,
                    name = %argument.name,
                    "Couldn't retrieve environment value, skipping"
                );
                None
            }
        })
        .collect()
}
