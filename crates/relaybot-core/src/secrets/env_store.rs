//! Environment variable secret store

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::traits::SecretStore;
use crate::resolver::{EnvLookup, ProcessEnv};

/// Logical credential names and the variables that hold them, in lookup order
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("llm", vec!["AI_API_KEY", "OPENAI_API_KEY"]);
    m.insert("redmine", vec!["REDMINE_API_KEY"]);
    m.insert("gitlab", vec!["GITLAB_TOKEN", "GITLAB_PRIVATE_TOKEN"]);
    m
});

/// Secret store over environment variables
///
/// `get("redmine")` checks `REDMINE_API_KEY`; any other key is looked up as a
/// variable name directly. Empty values count as missing.
pub struct EnvSecretStore {
    env: Arc<dyn EnvLookup>,
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSecretStore {
    /// Store backed by the real process environment
    pub fn new() -> Self {
        Self {
            env: Arc::new(ProcessEnv),
        }
    }

    /// Store backed by any environment lookup
    pub fn with_env(env: Arc<dyn EnvLookup>) -> Self {
        Self { env }
    }

    /// Variables consulted for a logical credential name
    pub fn env_vars_for(key: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(key.to_lowercase().as_str()).map(|v| v.as_slice())
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.env.var(name).filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(vars) = Self::env_vars_for(key) {
            return vars.iter().find_map(|var| self.non_empty(var));
        }
        self.non_empty(key)
    }
}

impl std::fmt::Debug for EnvSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSecretStore").finish_non_exhaustive()
    }
}
