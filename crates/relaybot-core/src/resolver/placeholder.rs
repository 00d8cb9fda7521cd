//! `${VAR}` placeholder substitution over JSON values

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Read access to environment variables
///
/// The process environment is one implementation; a plain map is another,
/// which keeps substitution testable without touching `std::env`.
pub trait EnvLookup: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Replace every `${VAR}` in `input`; unset variables become empty strings
pub fn substitute_str(input: &str, env: &dyn EnvLookup) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures<'_>| env.var(&caps[1]).unwrap_or_default())
        .into_owned()
}

/// Recursively substitute placeholders in every string of `value`
///
/// Sequences and mappings are walked; numbers, booleans and null pass through.
pub fn substitute(value: &Value, env: &dyn EnvLookup) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_str(s, env)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, env)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, env)))
                .collect(),
        ),
        other => other.clone(),
    }
}
