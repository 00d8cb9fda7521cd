//! Seam between the dispatcher and remote tool servers

use async_trait::async_trait;
use serde_json::Value;

use crate::types::ToolOutcome;

/// Invokes remotely hosted tools by composite key
///
/// Never fails: every error comes back as `success: false`.
#[async_trait]
pub trait RemoteTools: Send + Sync {
    async fn call_tool(&self, key: &str, arguments: Value) -> ToolOutcome;
}
