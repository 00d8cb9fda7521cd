//! Chat backend trait definition

use async_trait::async_trait;
use serde::Serialize;

use super::error::ProviderResult;
use crate::types::{ConversationMessage, ToolCallRequest, ToolSpec};

/// One chat-completions request: `{model, messages, tools}`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ConversationMessage],
    pub tools: &'a [ToolSpec],
}

impl<'a> CompletionRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [ConversationMessage], tools: &'a [ToolSpec]) -> Self {
        Self {
            model,
            messages,
            tools,
        }
    }
}

/// The assistant message of a completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: Option<String>,
}

impl AssistantReply {
    /// A plain text reply
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// A reply requesting tool calls, without text
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Chat backend abstraction
///
/// One call per conversation iteration; the full message list and the active
/// tool list are sent every time.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logs (e.g. "openai", "mock")
    fn name(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &CompletionRequest<'_>) -> ProviderResult<AssistantReply>;
}
