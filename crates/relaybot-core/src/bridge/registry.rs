//! Dynamic tool registry built by one discovery pass

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::protocol::RemoteTool;

/// One remotely hosted tool, addressable by its composite key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistryEntry {
    /// `"{server_id}_{tool_name}"`
    pub key: String,
    pub server_id: String,
    /// Resolved endpoint, query string included
    pub server_url: String,
    pub tool_name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolRegistryEntry {
    pub fn composite_key(server_id: &str, tool_name: &str) -> String {
        format!("{}_{}", server_id, tool_name)
    }

    pub fn new(server_id: &str, server_url: &str, tool: RemoteTool) -> Self {
        Self {
            key: Self::composite_key(server_id, &tool.name),
            server_id: server_id.to_string(),
            server_url: server_url.to_string(),
            tool_name: tool.name,
            description: tool.description,
            input_schema: tool.input_schema,
        }
    }
}

/// A server skipped during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    pub server_id: String,
    pub error: String,
}

/// Result of one discovery pass over every configured server
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    entries: HashMap<String, ToolRegistryEntry>,
    servers_queried: usize,
    failures: Vec<DiscoveryFailure>,
}

impl DiscoveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server's tools; returns the keys that replaced an existing entry
    pub fn merge_server(&mut self, server_id: &str, server_url: &str, tools: Vec<RemoteTool>) -> Vec<String> {
        self.servers_queried += 1;
        let mut replaced = Vec::new();
        for tool in tools {
            let entry = ToolRegistryEntry::new(server_id, server_url, tool);
            let key = entry.key.clone();
            if self.entries.insert(key.clone(), entry).is_some() {
                replaced.push(key);
            }
        }
        replaced
    }

    pub fn record_failure(&mut self, server_id: impl Into<String>, error: impl Into<String>) {
        self.servers_queried += 1;
        self.failures.push(DiscoveryFailure {
            server_id: server_id.into(),
            error: error.into(),
        });
    }

    pub fn get(&self, key: &str) -> Option<&ToolRegistryEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<&ToolRegistryEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub fn failures(&self) -> &[DiscoveryFailure] {
        &self.failures
    }

    pub fn servers_queried(&self) -> usize {
        self.servers_queried
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str, description: &str) -> RemoteTool {
        RemoteTool {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    #[test]
    fn test_composite_keys() {
        let mut report = DiscoveryReport::new();
        report.merge_server("redmine", "http://rm/mcp?k=1", vec![tool("create_issue", "")]);

        let entry = report.get("redmine_create_issue").unwrap();
        assert_eq!(entry.tool_name, "create_issue");
        assert_eq!(entry.server_url, "http://rm/mcp?k=1");
        assert!(report.get("create_issue").is_none());
    }

    #[test]
    fn test_later_server_wins_collision() {
        // "a_b" + "c" and "a" + "b_c" both map to "a_b_c"
        let mut report = DiscoveryReport::new();
        assert!(report.merge_server("a_b", "http://first", vec![tool("c", "first")]).is_empty());
        let replaced = report.merge_server("a", "http://second", vec![tool("b_c", "second")]);

        assert_eq!(replaced, vec!["a_b_c".to_string()]);
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("a_b_c").unwrap().description, "second");
    }

    #[test]
    fn test_failures_recorded() {
        let mut report = DiscoveryReport::new();
        report.merge_server("ok", "http://ok", vec![tool("t", "")]);
        report.record_failure("down", "HTTP error");

        assert_eq!(report.servers_queried(), 2);
        assert_eq!(report.failures()[0].server_id, "down");
        assert_eq!(report.entries().len(), 1);
    }
}
