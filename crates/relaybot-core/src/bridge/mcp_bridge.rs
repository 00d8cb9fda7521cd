//! Multi-server tool bridge: configuration, discovery and invocation

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;

use super::client::{redact, McpHttpClient};
use super::error::BridgeResult;
use super::protocol::{build_url, first_text, is_error_result, RemoteTool};
use super::registry::DiscoveryReport;
use super::traits::RemoteTools;
use crate::config::{ServerConfig, ServerConfigSource};
use crate::logging::{Logger, SharedLogger};
use crate::resolver::EnvLookup;
use crate::types::ToolOutcome;
use crate::{log_debug, log_error, log_info, log_warn};

/// Bridge to every configured remote tool server
///
/// Holds no registry between calls: each invocation runs a fresh discovery
/// pass, so servers that restart or change their tool set are picked up
/// immediately.
pub struct McpBridge {
    source: Arc<dyn ServerConfigSource>,
    env: Arc<dyn EnvLookup>,
    client: McpHttpClient,
    logger: SharedLogger,
}

impl McpBridge {
    pub fn new(
        source: Arc<dyn ServerConfigSource>,
        env: Arc<dyn EnvLookup>,
        http: reqwest::Client,
        logger: SharedLogger,
    ) -> Self {
        Self {
            source,
            env,
            client: McpHttpClient::new(http, Arc::clone(&logger)),
            logger,
        }
    }

    /// Configured servers with placeholders resolved
    ///
    /// When the source cannot be read, the single hosted fallback server is used.
    pub async fn servers(&self) -> Vec<ServerConfig> {
        let servers = match self.source.load_servers().await {
            Ok(servers) => servers,
            Err(e) => {
                log_warn!(
                    self.logger,
                    "[McpBridge] Cannot read {} ({}), using fallback server",
                    self.source.describe(),
                    e
                );
                vec![ServerConfig::fallback()]
            }
        };
        servers.iter().map(|s| s.resolve(self.env.as_ref())).collect()
    }

    /// Query every server concurrently and merge in configuration order
    ///
    /// Never fails; unreachable or misbehaving servers are listed in the
    /// report's failures.
    pub async fn discover(&self) -> DiscoveryReport {
        let servers = self.servers().await;
        let results = join_all(servers.iter().map(|s| self.query_server(s))).await;

        let mut report = DiscoveryReport::new();
        for (server, result) in servers.iter().zip(results) {
            match result {
                Ok((url, tools)) => {
                    log_debug!(self.logger, "[McpBridge] {}: {} tools", server.id, tools.len());
                    for key in report.merge_server(&server.id, &url, tools) {
                        log_warn!(self.logger, "[McpBridge] Tool key {} redefined by server {}", key, server.id);
                    }
                }
                Err(e) => {
                    log_warn!(self.logger, "[McpBridge] Discovery failed for {}: {}", server.id, e);
                    report.record_failure(&server.id, e.to_string());
                }
            }
        }

        log_info!(
            self.logger,
            "[McpBridge] Discovered {} tools from {} servers ({} failed)",
            report.len(),
            report.servers_queried(),
            report.failures().len()
        );
        report
    }

    async fn query_server(&self, server: &ServerConfig) -> BridgeResult<(String, Vec<RemoteTool>)> {
        let url = build_url(&server.url, &server.params)?;
        let tools = self.client.list_tools(&url).await?;
        Ok((url, tools))
    }
}

#[async_trait]
impl RemoteTools for McpBridge {
    async fn call_tool(&self, key: &str, arguments: Value) -> ToolOutcome {
        let report = self.discover().await;
        let entry = match report.get(key) {
            Some(entry) => entry,
            None => {
                log_warn!(self.logger, "[McpBridge] Tool not found: {}", key);
                return ToolOutcome::failure_with_error(
                    "Tool not found",
                    format!("Tool {} is not provided by any configured server", key),
                );
            }
        };

        log_info!(
            self.logger,
            "[McpBridge] Calling {} on {} ({})",
            entry.tool_name,
            entry.server_id,
            redact(&entry.server_url)
        );
        match self
            .client
            .call_tool(&entry.server_url, &entry.tool_name, arguments)
            .await
        {
            Ok(result) => outcome_from_result(result),
            Err(e) => {
                log_error!(self.logger, "[McpBridge] {} failed: {}", key, e);
                ToolOutcome::failure_with_error(e.to_string(), format!("Error: {}", e))
            }
        }
    }
}

/// Normalize a `tools/call` result
///
/// The first text block becomes both `message` and `data`; without a
/// non-empty one the raw result is returned as `data`.
pub(crate) fn outcome_from_result(result: Value) -> ToolOutcome {
    let text = first_text(&result).filter(|t| !t.is_empty()).map(str::to_string);
    if is_error_result(&result) {
        let message = text.unwrap_or_else(|| "Tool reported an error".to_string());
        return ToolOutcome::failure_with_error(message.clone(), message);
    }
    match text {
        Some(text) => ToolOutcome::ok(text.clone()).data(Value::String(text)),
        None => ToolOutcome::with_data(result).message("Tool executed successfully"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileServerConfig, MemoryServerConfig, DEFAULT_SERVER_URL};
    use crate::logging::NoOpLogger;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Arc<dyn EnvLookup> {
        Arc::new(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<String, String>>(),
        )
    }

    fn bridge(source: Arc<dyn ServerConfigSource>, env: Arc<dyn EnvLookup>) -> McpBridge {
        McpBridge::new(source, env, reqwest::Client::new(), Arc::new(NoOpLogger))
    }

    #[tokio::test]
    async fn test_unreadable_config_uses_fallback_server() {
        let source = Arc::new(FileServerConfig::new("/nonexistent/mcp-config.json"));
        let bridge = bridge(source, env(&[("REDMINE_URL", "https://rm.example"), ("REDMINE_API_KEY", "k")]));

        let servers = bridge.servers().await;
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].id, "redmine");
        assert_eq!(servers[0].url, DEFAULT_SERVER_URL);
        assert_eq!(servers[0].params["redmine_url"], json!("https://rm.example"));
        assert_eq!(servers[0].params["api_key"], json!("k"));
    }

    #[tokio::test]
    async fn test_malformed_entry_does_not_trigger_fallback() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mcp-config.json");
        std::fs::write(
            &path,
            r#"{"mcpServers": {
                "jira": {"url": "http://127.0.0.1:9/jira"},
                "gitlab": {"url": "http://127.0.0.1:9/gitlab"},
                "typo": {"uri": "http://127.0.0.1:9/typo"}
            }}"#,
        )
        .unwrap();
        let bridge = bridge(Arc::new(FileServerConfig::new(path)), env(&[("REDMINE_API_KEY", "k")]));

        let ids: Vec<String> = bridge.servers().await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["jira", "gitlab", "typo"]);

        let report = bridge.discover().await;
        let typo = report.failures().iter().find(|f| f.server_id == "typo").unwrap();
        assert!(typo.error.contains("no url configured"));
    }

    #[tokio::test]
    async fn test_servers_resolved_in_order() {
        let source = Arc::new(MemoryServerConfig::with_servers(vec![
            ServerConfig::new("b", "http://${HOST}/b"),
            ServerConfig::new("a", "http://${HOST}/a").with_param("token", "${TOKEN}"),
        ]));
        let servers = bridge(source, env(&[("HOST", "tools")])).servers().await;

        assert_eq!(servers[0].url, "http://tools/b");
        assert_eq!(servers[1].url, "http://tools/a");
        assert_eq!(servers[1].params["token"], json!(""));
    }

    #[tokio::test]
    async fn test_no_servers_means_nothing_found() {
        let bridge = bridge(Arc::new(MemoryServerConfig::new()), env(&[]));
        let report = bridge.discover().await;
        assert!(report.is_empty());
        assert_eq!(report.servers_queried(), 0);

        let outcome = bridge.call_tool("redmine_list_my_tasks", json!({})).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Tool not found"));
    }

    #[test]
    fn test_outcome_from_text_result() {
        let outcome = outcome_from_result(json!({"content": [{"type": "text", "text": "Logged 2h"}]}));
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Logged 2h"));
        assert_eq!(outcome.data, Some(json!("Logged 2h")));
    }

    #[test]
    fn test_outcome_from_raw_result() {
        let outcome = outcome_from_result(json!({"structured": {"id": 3}}));
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Tool executed successfully"));
        assert_eq!(outcome.data, Some(json!({"structured": {"id": 3}})));
    }

    #[test]
    fn test_outcome_from_empty_text_keeps_raw_result() {
        let raw = json!({"content": [{"type": "text", "text": ""}], "meta": {"count": 0}});
        let outcome = outcome_from_result(raw.clone());
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Tool executed successfully"));
        assert_eq!(outcome.data, Some(raw));
    }

    #[test]
    fn test_outcome_from_error_result() {
        let outcome = outcome_from_result(json!({"content": [{"type": "text", "text": "Issue 9 not found"}], "isError": true}));
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Issue 9 not found"));
    }
}
