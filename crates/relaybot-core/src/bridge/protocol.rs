//! JSON-RPC over HTTP/SSE wire helpers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::error::{BridgeError, BridgeResult};

/// First `data:` line opening an object, greedy through the last `}` of the body
static SSE_PAYLOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)data:\s?(\{.*\})").expect("payload pattern is valid"));

pub const ACCEPT: &str = "application/json, text/event-stream";

/// A tool as announced by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

/// Query-string form of a parameter, or `None` when the value is falsy
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Append every non-empty parameter to `base` as a query string, in order
///
/// Empty strings, `false`, `0` and `null` are dropped. When nothing is
/// left the base URL is returned untouched. A blank base is rejected.
pub fn build_url(base: &str, params: &Map<String, Value>) -> BridgeResult<String> {
    if base.trim().is_empty() {
        return Err(BridgeError::InvalidUrl {
            url: base.to_string(),
            reason: "no url configured".to_string(),
        });
    }
    let pairs: Vec<(&str, String)> = params
        .iter()
        .filter_map(|(k, v)| query_value(v).map(|v| (k.as_str(), v)))
        .collect();
    if pairs.is_empty() {
        return Ok(base.to_string());
    }

    let mut url = reqwest::Url::parse(base).map_err(|e| BridgeError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url.into())
}

/// Pull the JSON-RPC envelope out of a response body
///
/// Accepts a bare JSON body or an event stream whose payload sits in a
/// `data:` line; the JSON may span several lines.
pub fn extract_payload(body: &str) -> BridgeResult<Value> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let captured = SSE_PAYLOAD
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or(BridgeError::MissingPayload)?;
    Ok(serde_json::from_str(captured.as_str())?)
}

/// JSON-RPC 2.0 request envelope
pub fn rpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// The `result` member of an envelope; `error` becomes `BridgeError::Rpc`
///
/// A missing `result` is `null`.
pub fn rpc_result(mut envelope: Value) -> BridgeResult<Value> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(BridgeError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    Ok(envelope.get_mut("result").map(Value::take).unwrap_or(Value::Null))
}

/// Tools from a `tools/list` result; entries without a name are skipped
pub fn parse_tool_list(result: &Value) -> Vec<RemoteTool> {
    result
        .get("tools")
        .and_then(Value::as_array)
        .map(|tools| {
            tools
                .iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// `result.content[0].text` of a `tools/call` result
pub fn first_text(result: &Value) -> Option<&str> {
    result.pointer("/content/0/text").and_then(Value::as_str)
}

/// Whether a `tools/call` result flags a tool-level error
pub fn is_error_result(result: &Value) -> bool {
    result.get("isError").and_then(Value::as_bool).unwrap_or(false)
}
