//! Core traits and types for credential lookup

use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Secret not found: {0}")]
    NotFound(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Read-only credential lookup
///
/// Keys are either logical names (`llm`, `redmine`, `gitlab`) or raw
/// variable names; how a store maps them is up to the implementation.
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by key
    fn get(&self, key: &str) -> Option<String>;

    /// Check if a secret exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Retrieve a secret that must exist
    fn require(&self, key: &str) -> SecretStoreResult<String> {
        self.get(key).ok_or_else(|| SecretStoreError::NotFound(key.to_string()))
    }
}
