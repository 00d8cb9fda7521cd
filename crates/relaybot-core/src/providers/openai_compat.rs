//! OpenAI-compatible chat-completions backend

use async_trait::async_trait;
use serde::Deserialize;

use super::error::{ProviderError, ProviderResult};
use super::traits::{AssistantReply, ChatBackend, CompletionRequest};
use crate::logging::{Logger, SharedLogger};
use crate::types::ToolCallRequest;
use crate::{log_debug, log_warn};

const PROVIDER: &str = "openai";

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRequest>>,
}

/// Talks to any endpoint that speaks the chat-completions protocol
///
/// The request timeout is whatever the supplied `reqwest::Client` was built with.
pub struct OpenAiCompatBackend {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    logger: SharedLogger,
}

impl OpenAiCompatBackend {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        logger: SharedLogger,
    ) -> ProviderResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::missing_api_key(PROVIDER));
        }
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
            logger,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> ProviderResult<AssistantReply> {
        log_debug!(
            self.logger,
            "[OpenAiCompatBackend] POST {} model={} messages={} tools={}",
            self.endpoint,
            request.model,
            request.messages.len(),
            request.tools.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log_warn!(self.logger, "[OpenAiCompatBackend] API error {}: {}", status.as_u16(), body);
            return Err(ProviderError::api_error(PROVIDER, status.as_u16(), body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::invalid_response(PROVIDER, "no choices in response"))?;
        let message = choice
            .message
            .ok_or_else(|| ProviderError::invalid_response(PROVIDER, "choice has no message"))?;

        let reply = AssistantReply {
            content: message.content,
            tool_calls: message.tool_calls.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        };
        log_debug!(
            self.logger,
            "[OpenAiCompatBackend] finish_reason={:?} tool_calls={}",
            reply.finish_reason,
            reply.tool_calls.len()
        );
        Ok(reply)
    }
}
