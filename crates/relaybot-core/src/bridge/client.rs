//! HTTP transport for remote tool servers

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Value};

use super::error::{BridgeError, BridgeResult};
use super::protocol::{extract_payload, parse_tool_list, rpc_request, rpc_result, RemoteTool, ACCEPT};
use crate::logging::{Logger, SharedLogger};
use crate::log_debug;

/// Stateless JSON-RPC client; every call is one POST
///
/// Transport errors are stripped of their URL, since server endpoints carry
/// credentials in the query string.
pub struct McpHttpClient {
    http: reqwest::Client,
    request_id: AtomicU64,
    logger: SharedLogger,
}

impl McpHttpClient {
    pub fn new(http: reqwest::Client, logger: SharedLogger) -> Self {
        let seed = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self {
            http,
            request_id: AtomicU64::new(seed),
            logger,
        }
    }

    /// `tools/list` against one endpoint
    pub async fn list_tools(&self, url: &str) -> BridgeResult<Vec<RemoteTool>> {
        let result = self.request(url, "tools/list", json!({})).await?;
        Ok(parse_tool_list(&result))
    }

    /// `tools/call`; returns the raw `result`
    pub async fn call_tool(&self, url: &str, name: &str, arguments: Value) -> BridgeResult<Value> {
        self.request(url, "tools/call", json!({ "name": name, "arguments": arguments }))
            .await
    }

    async fn request(&self, url: &str, method: &str, params: Value) -> BridgeResult<Value> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        log_debug!(self.logger, "[McpHttpClient] {} #{} -> {}", method, id, redact(url));

        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .json(&rpc_request(id, method, params))
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.without_url())?;
        if !status.is_success() {
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        rpc_result(extract_payload(&body)?)
    }
}

/// Endpoint without its query string, which usually carries credentials
pub(crate) fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

impl std::fmt::Debug for McpHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpHttpClient")
            .field("request_id", &self.request_id.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_query() {
        assert_eq!(redact("https://mcp.example/api?api_key=secret"), "https://mcp.example/api");
        assert_eq!(redact("https://mcp.example/api"), "https://mcp.example/api");
    }
}
