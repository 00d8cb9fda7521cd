//! Mock backend for testing
//!
//! Deterministic replies without network access. Every request is recorded so
//! tests can assert on exactly what the conversation driver sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::traits::{AssistantReply, ChatBackend, CompletionRequest};
use crate::logging::{Logger, SharedLogger};
use crate::log_debug;
use crate::types::{ConversationMessage, Role, ToolCallRequest};

/// One scripted step
#[derive(Debug, Clone)]
pub enum MockStep {
    Reply(AssistantReply),
    /// Non-success HTTP status
    Reject { status: u16, message: String },
    /// Transport-level failure
    Fail(String),
}

/// What to do once the script is used up
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Request the same tool call forever
    AlwaysToolCall { name: String, arguments: String },
}

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<ConversationMessage>,
    pub tool_names: Vec<String>,
}

/// Mock chat backend
pub struct MockBackend {
    script: Mutex<VecDeque<MockStep>>,
    mode: MockMode,
    requests: Mutex<Vec<RecordedRequest>>,
    calls: AtomicUsize,
    logger: SharedLogger,
}

impl MockBackend {
    pub fn new(mode: MockMode, logger: SharedLogger) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            mode,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            logger,
        }
    }

    /// Create an echo backend (echoes back the last user message)
    pub fn echo(logger: SharedLogger) -> Self {
        Self::new(MockMode::Echo, logger)
    }

    pub fn fixed(response: impl Into<String>, logger: SharedLogger) -> Self {
        Self::new(MockMode::Fixed(response.into()), logger)
    }

    /// A model that never stops asking for `name`
    pub fn always_tool_call(name: impl Into<String>, arguments: impl Into<String>, logger: SharedLogger) -> Self {
        Self::new(
            MockMode::AlwaysToolCall {
                name: name.into(),
                arguments: arguments.into(),
            },
            logger,
        )
    }

    /// Play `steps` in order, then fall back to echo
    pub fn scripted(steps: impl IntoIterator<Item = MockStep>, logger: SharedLogger) -> Self {
        Self::echo(logger).with_script(steps)
    }

    pub fn with_script(self, steps: impl IntoIterator<Item = MockStep>) -> Self {
        self.script.lock().extend(steps);
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_user_message(messages: &[ConversationMessage]) -> String {
        messages
            .iter()
            .rev()
            .filter(|m| m.role == Role::User)
            .find_map(|m| m.text().filter(|t| !t.is_empty()))
            .unwrap_or("Hello from MockBackend!")
            .to_string()
    }

    fn reply_from_mode(&self, call: usize, messages: &[ConversationMessage]) -> AssistantReply {
        match &self.mode {
            MockMode::Echo => AssistantReply::text(format!("Echo: {}", Self::last_user_message(messages))),
            MockMode::Fixed(text) => AssistantReply::text(text.clone()),
            MockMode::AlwaysToolCall { name, arguments } => AssistantReply::tool_calls(vec![ToolCallRequest::new(
                format!("call_{}", call),
                name.clone(),
                arguments.clone(),
            )]),
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> ProviderResult<AssistantReply> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(RecordedRequest {
            model: request.model.to_string(),
            messages: request.messages.to_vec(),
            tool_names: request.tools.iter().map(|t| t.name().to_string()).collect(),
        });
        log_debug!(self.logger, "[MockBackend] Call {} with {} messages", call, request.messages.len());

        let step = self.script.lock().pop_front();
        match step {
            Some(MockStep::Reply(reply)) => Ok(reply),
            Some(MockStep::Reject { status, message }) => Err(ProviderError::api_error("mock", status, message)),
            Some(MockStep::Fail(message)) => Err(ProviderError::Other(message)),
            None => Ok(self.reply_from_mode(call, request.messages)),
        }
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("mode", &self.mode)
            .field("remaining_steps", &self.script.lock().len())
            .field("calls", &self.call_count())
            .finish()
    }
}
