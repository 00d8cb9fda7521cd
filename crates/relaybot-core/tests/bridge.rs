//! Remote tool bridge against mock tool servers

use std::collections::HashMap;
use std::sync::Arc;

use relaybot_core::bridge::{McpBridge, RemoteTools};
use relaybot_core::config::{MemoryServerConfig, ServerConfig};
use relaybot_core::logging::{LogLevel, MemoryLogger, SharedLogger};
use relaybot_core::resolver::EnvLookup;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rpc(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

fn tool_list(names: &[&str]) -> Value {
    let tools: Vec<Value> = names
        .iter()
        .map(|n| json!({"name": n, "description": format!("{} tool", n), "inputSchema": {"type": "object"}}))
        .collect();
    rpc(json!({ "tools": tools }))
}

fn sse(body: &Value) -> String {
    format!("event: message\ndata: {}\n\n", body)
}

fn env(vars: &[(&str, &str)]) -> Arc<dyn EnvLookup> {
    Arc::new(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<String, String>>(),
    )
}

fn bridge(servers: Vec<ServerConfig>, env: Arc<dyn EnvLookup>) -> (McpBridge, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let shared: SharedLogger = logger.clone();
    let source = Arc::new(MemoryServerConfig::with_servers(servers));
    (McpBridge::new(source, env, reqwest::Client::new(), shared), logger)
}

async fn mount_list(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(body_partial_json(json!({"method": "tools/list"})))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Three servers: one answers as an event stream, one as bare JSON, one with garbage
async fn three_servers() -> MockServer {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "/redmine",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_string(sse(&tool_list(&["create_issue", "update_issue"]))),
    )
    .await;
    mount_list(&server, "/wiki", ResponseTemplate::new(200).set_body_json(tool_list(&["search"]))).await;
    mount_list(&server, "/broken", ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;
    server
}

fn servers(base: &str) -> Vec<ServerConfig> {
    vec![
        ServerConfig::new("redmine", format!("{}/redmine", base)),
        ServerConfig::new("wiki", format!("{}/wiki", base)),
        ServerConfig::new("broken", format!("{}/broken", base)),
    ]
}

#[tokio::test]
async fn test_discovery_skips_failing_server() {
    let server = three_servers().await;
    let (bridge, logger) = bridge(servers(&server.uri()), env(&[]));

    let report = bridge.discover().await;

    assert_eq!(report.servers_queried(), 3);
    assert_eq!(report.len(), 3);
    let keys: Vec<&str> = report.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["redmine_create_issue", "redmine_update_issue", "wiki_search"]);

    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].server_id, "broken");
    assert!(logger.contains(LogLevel::Warn, "Discovery failed for broken"));
}

#[tokio::test]
async fn test_call_routes_to_owning_server() {
    let server = three_servers().await;
    Mock::given(method("POST"))
        .and(path("/redmine"))
        .and(body_partial_json(json!({
            "method": "tools/call",
            "params": {"name": "create_issue", "arguments": {"subject": "Login bug", "project_id": "42"}}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(sse(&rpc(json!({
                "content": [{"type": "text", "text": "Created issue #101"}]
            })))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (bridge, _) = bridge(servers(&server.uri()), env(&[]));
    let outcome = bridge
        .call_tool("redmine_create_issue", json!({"subject": "Login bug", "project_id": "42"}))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Created issue #101"));
    assert_eq!(outcome.data, Some(json!("Created issue #101")));
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let server = three_servers().await;
    let (bridge, _) = bridge(servers(&server.uri()), env(&[]));

    let outcome = bridge.call_tool("redmine_delete_everything", json!({})).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Tool not found"));
}

#[tokio::test]
async fn test_tool_error_and_rpc_error_become_failures() {
    let server = MockServer::start().await;
    mount_list(&server, "/mcp", ResponseTemplate::new(200).set_body_json(tool_list(&["log_time", "add_note"]))).await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "tools/call", "params": {"name": "log_time"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc(json!({
            "isError": true,
            "content": [{"type": "text", "text": "Issue 7 is closed"}]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "tools/call", "params": {"name": "add_note"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "missing notes"}
        })))
        .mount(&server)
        .await;

    let (bridge, _) = bridge(vec![ServerConfig::new("redmine", format!("{}/mcp", server.uri()))], env(&[]));

    let logged = bridge.call_tool("redmine_log_time", json!({"issue_id": 7, "hours": 1})).await;
    assert!(!logged.success);
    assert_eq!(logged.message.as_deref(), Some("Issue 7 is closed"));

    let noted = bridge.call_tool("redmine_add_note", json!({"issue_id": 7})).await;
    assert!(!noted.success);
    assert!(noted.message.unwrap_or_default().contains("missing notes"));
}

#[tokio::test]
async fn test_placeholders_become_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(query_param("redmine_url", "https://redmine.example.com"))
        .and(query_param("api_key", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_list(&["get_user_info"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ServerConfig::new("redmine", format!("{}/mcp", server.uri()))
        .with_param("redmine_url", "${REDMINE_URL}")
        .with_param("api_key", "${REDMINE_API_KEY}")
        .with_param("debug", false);
    let (bridge, logger) = bridge(
        vec![config],
        env(&[("REDMINE_URL", "https://redmine.example.com"), ("REDMINE_API_KEY", "s3cret")]),
    );

    let report = bridge.discover().await;
    assert_eq!(report.len(), 1);
    let entry = report.get("redmine_get_user_info").unwrap();
    assert!(entry.server_url.contains("api_key=s3cret"));
    assert!(!entry.server_url.contains("debug"));
    assert!(!logger.records().iter().any(|(_, m)| m.contains("s3cret")));
}

#[tokio::test]
async fn test_non_success_status_is_a_discovery_failure() {
    let server = MockServer::start().await;
    mount_list(&server, "/mcp", ResponseTemplate::new(503).set_body_string("busy")).await;

    let (bridge, _) = bridge(vec![ServerConfig::new("redmine", format!("{}/mcp", server.uri()))], env(&[]));
    let report = bridge.discover().await;

    assert!(report.is_empty());
    assert!(report.failures()[0].error.contains("503"));
}
