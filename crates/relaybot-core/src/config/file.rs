//! File-based tool-server configuration
//!
//! Reads `mcp-config.json` from the working directory by default. Files ending
//! in `.yaml` or `.yml` are parsed as YAML, everything else as JSON:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "redmine": {
//!       "url": "https://redmine-mcp-server.vercel.app/api/mcp",
//!       "params": { "redmine_url": "${REDMINE_URL}", "api_key": "${REDMINE_API_KEY}" }
//!     }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::server::ServerConfig;
use super::traits::{ConfigError, ConfigResult, ServerConfigSource};

/// Default file name, looked up relative to the working directory
pub const DEFAULT_SERVERS_FILE: &str = "mcp-config.json";

/// On-disk layout of the servers file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServersFile {
    /// Server id -> `{url, params}`, in file order
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: Map<String, Value>,
}

impl ServersFile {
    /// Parse file contents, choosing the format from the path extension
    pub fn parse(path: &Path, content: &str) -> ConfigResult<Self> {
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Ok(serde_yaml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    /// Convert the mapping into server configs, keeping file order
    ///
    /// A malformed entry still yields a server under its id, with an empty
    /// URL when none is given, so only that server fails discovery.
    pub fn into_servers(self) -> Vec<ServerConfig> {
        self.mcp_servers
            .into_iter()
            .map(|(id, raw)| ServerConfig {
                id,
                url: raw.get("url").and_then(Value::as_str).unwrap_or_default().to_string(),
                params: raw.get("params").and_then(Value::as_object).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// Server configuration read from disk on every load
///
/// Reading on each call means edits to the file take effect on the next
/// conversation turn without a restart.
#[derive(Debug, Clone)]
pub struct FileServerConfig {
    path: PathBuf,
}

impl FileServerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `mcp-config.json` in the current working directory
    pub fn working_dir() -> Self {
        Self::new(DEFAULT_SERVERS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

}

#[async_trait]
impl ServerConfigSource for FileServerConfig {
    /// Re-reads the file on every call
    async fn load_servers(&self) -> ConfigResult<Vec<ServerConfig>> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(ServersFile::parse(&self.path, &content)?.into_servers())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> FileServerConfig {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        FileServerConfig::new(path)
    }

    #[tokio::test]
    async fn test_json_servers_in_file_order() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "mcp-config.json",
            r#"{
                "mcpServers": {
                    "zeta": {"url": "http://zeta/mcp"},
                    "alpha": {"url": "http://alpha/mcp", "params": {"api_key": "${KEY}"}}
                }
            }"#,
        );

        let servers = config.load_servers().await.unwrap();
        let ids: Vec<&str> = servers.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
        assert!(servers[0].params.is_empty());
        assert_eq!(servers[1].params["api_key"], json!("${KEY}"));
    }

    #[tokio::test]
    async fn test_yaml_servers() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "servers.yaml",
            "mcpServers:\n  gitlab:\n    url: http://gl/mcp\n    params:\n      token: abc\n",
        );

        let servers = config.load_servers().await.unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].id, "gitlab");
        assert_eq!(servers[0].params["token"], json!("abc"));
    }

    #[tokio::test]
    async fn test_missing_section_means_no_servers() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "mcp-config.json", "{}");
        assert!(config.load_servers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_and_bad_content() {
        let dir = TempDir::new().unwrap();
        let missing = FileServerConfig::new(dir.path().join("nope.json"));
        assert!(!missing.exists());
        assert!(matches!(missing.load_servers().await, Err(ConfigError::NotFound(_))));

        let broken = write(&dir, "broken.json", "{ not json");
        assert!(matches!(broken.load_servers().await, Err(ConfigError::Json(_))));
    }

    #[tokio::test]
    async fn test_malformed_entry_keeps_other_servers() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "mcp-config.json",
            r#"{
                "mcpServers": {
                    "jira": {"url": "http://jira/mcp"},
                    "typo": {"uri": "http://typo/mcp", "params": {"k": "v"}},
                    "gitlab": {"url": "http://gl/mcp"},
                    "junk": 5
                }
            }"#,
        );

        let servers = config.load_servers().await.unwrap();
        let ids: Vec<&str> = servers.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["jira", "typo", "gitlab", "junk"]);
        assert_eq!(servers[0].url, "http://jira/mcp");
        assert_eq!(servers[1].url, "");
        assert_eq!(servers[1].params["k"], json!("v"));
        assert_eq!(servers[2].url, "http://gl/mcp");
        assert!(servers[3].params.is_empty());
    }
}
