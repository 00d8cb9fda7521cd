//! Tool-server configuration source trait

use std::path::PathBuf;

use async_trait::async_trait;

use super::server::ServerConfig;

/// Where the list of remote tool servers comes from
///
/// Implementations:
/// - `MemoryServerConfig`: fixed list, for tests and programmatic setups
/// - `FileServerConfig`: `mcp-config.json` (or YAML) on disk
#[async_trait]
pub trait ServerConfigSource: Send + Sync {
    /// Load all configured servers in configuration order, placeholders unresolved
    async fn load_servers(&self) -> ConfigResult<Vec<ServerConfig>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
