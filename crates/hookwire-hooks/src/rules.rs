//! Trigger rule grammar and evaluation
//!
//! Rules are boolean trees over request data:
//!
//! ```ignore
//! "trigger-rule": {
//!   "and": [
//!     { "match": { "type": "payload-hash-sha256", "secret": "s3cr3t",
//!                  "parameter": { "source": "header", "name": "X-Hub-Signature-256" } } },
//!     { "match": { "type": "value", "value": "refs/heads/main",
//!                  "parameter": { "source": "payload", "name": "ref" } } }
//!   ]
//! }
//! ```
//!
//! The execution engine only depends on the [`Evaluate`] trait.

use hmac::{Hmac, Mac};
use regex::Regex;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use crate::{context::RequestContext, params::extract_parameter, types::Argument};

type HmacSha256 = Hmac<Sha256>;

/// A predicate over a request context
pub trait Evaluate: Send + Sync {
    /// Whether the request satisfies the predicate
    fn evaluate(&self, context: &RequestContext) -> bool;
}

/// Boolean rule tree
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerRule {
    /// All sub-rules hold (true when empty)
    And(Vec<TriggerRule>),

    /// Any sub-rule holds (false when empty)
    Or(Vec<TriggerRule>),

    /// The sub-rule does not hold
    Not(Box<TriggerRule>),

    /// Leaf comparison
    Match(MatchRule),
}

impl TriggerRule {
    /// Conjunction
    pub fn and(rules: Vec<TriggerRule>) -> Self {
        TriggerRule::And(rules)
    }

    /// Disjunction
    pub fn or(rules: Vec<TriggerRule>) -> Self {
        TriggerRule::Or(rules)
    }

    /// Negation
    pub fn not(rule: TriggerRule) -> Self {
        TriggerRule::Not(Box::new(rule))
    }

    /// Exact value match leaf
    pub fn value(parameter: Argument, value: impl Into<String>) -> Self {
        TriggerRule::Match(MatchRule::Value {
            value: value.into(),
            parameter,
        })
    }

    /// Regex match leaf
    pub fn regex(parameter: Argument, pattern: &str) -> Result<Self, regex::Error> {
        Ok(TriggerRule::Match(MatchRule::Regex {
            regex: Pattern::new(pattern)?,
            parameter,
        }))
    }

    /// HMAC-SHA256 signature leaf
    pub fn payload_hash_sha256(parameter: Argument, secret: impl Into<String>) -> Self {
        TriggerRule::Match(MatchRule::PayloadHashSha256 {
            secret: secret.into(),
            parameter,
        })
    }

    /// Iterate over every leaf in the tree
    pub fn leaves(&self) -> Vec<&MatchRule> {
        match self {
            TriggerRule::And(rules) | TriggerRule::Or(rules) => {
                rules.iter().flat_map(TriggerRule::leaves).collect()
            }
            TriggerRule::Not(rule) => rule.leaves(),
            TriggerRule::Match(rule) => vec![rule],
        }
    }
}

impl Evaluate for TriggerRule {
    fn evaluate(&self, context: &RequestContext) -> bool {
        match self {
            TriggerRule::And(rules) => rules.iter().all(|rule| rule.evaluate(context)),
            TriggerRule::Or(rules) => rules.iter().any(|rule| rule.evaluate(context)),
            TriggerRule::Not(rule) => !rule.evaluate(context),
            TriggerRule::Match(rule) => rule.evaluate(context),
        }
    }
}

/// Leaf comparison against one extracted parameter
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MatchRule {
    /// Parameter equals `value`
    Value {
        /// Expected value
        value: String,
        /// Parameter to compare
        parameter: Argument,
    },

    /// Parameter matches `regex` (unanchored)
    Regex {
        /// Compiled pattern
        regex: Pattern,
        /// Parameter to test
        parameter: Argument,
    },

    /// Parameter holds the hex HMAC-SHA256 of the raw body under `secret`
    PayloadHashSha256 {
        /// Shared secret
        secret: String,
        /// Parameter holding the signature, optionally `sha256=` prefixed
        parameter: Argument,
    },
}

impl MatchRule {
    /// The parameter this leaf reads
    pub fn parameter(&self) -> &Argument {
        match self {
            MatchRule::Value { parameter, .. }
            | MatchRule::Regex { parameter, .. }
            | MatchRule::PayloadHashSha256 { parameter, .. } => parameter,
        }
    }
}

impl Evaluate for MatchRule {
    fn evaluate(&self, context: &RequestContext) -> bool {
        let Some(actual) = extract_parameter(self.parameter(), context) else {
            debug!(
                source = ?self.parameter().source,
                name = %self.parameter().name,
                "Rule parameter not present"
            );
            return false;
        };

        match self {
            MatchRule::Value { value, .. } => actual == *value,
            MatchRule::Regex { regex, .. } => regex.is_match(&actual),
            MatchRule::PayloadHashSha256 { secret, .. } => {
                verify_signature(secret, &context.raw_body, &actual)
            }
        }
    }
}

/// Check a hex HMAC-SHA256 signature in constant time
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(expected) = hex::decode(signature) else {
        debug!("Signature is not valid hex");
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// A regex compiled when the definitions are loaded
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    /// Unanchored match
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Pattern::new(&pattern)
    }
}
