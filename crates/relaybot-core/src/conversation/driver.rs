//! Tool-calling conversation loop

use std::sync::Arc;

use chrono::FixedOffset;
use serde_json::json;

use super::context::{local_now, system_prompt, utc_offset};
use super::fallback::FallbackMessages;
use crate::config::DEFAULT_MODEL;
use crate::dispatch::Dispatcher;
use crate::logging::{Logger, SharedLogger};
use crate::providers::{ChatBackend, CompletionRequest};
use crate::tools::{select_mode, Mode};
use crate::types::{ConversationMessage, ToolCallRequest, ToolSpec};
use crate::{log_debug, log_error, log_info, log_warn};

/// Default bound on model calls per turn
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// How the turn's mode is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSelector {
    /// Keyword detection on the latest user message
    #[default]
    Auto,
    Fixed(Mode),
}

/// Input to one turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub history: Vec<ConversationMessage>,
    pub model: String,
    pub mode: ModeSelector,
    pub project_id: Option<String>,
}

impl TurnRequest {
    pub fn new(history: Vec<ConversationMessage>) -> Self {
        Self {
            history,
            model: DEFAULT_MODEL.to_string(),
            mode: ModeSelector::Auto,
            project_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = ModeSelector::Fixed(mode);
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// Why a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    /// The model answered with text
    Reply,
    /// The model answered with empty text
    EmptyReply,
    /// The iteration bound was reached while tools were still being requested
    IterationLimit,
    /// The backend returned a non-success status
    BackendRejected,
    /// Transport or decoding failure
    Failed,
}

/// Everything a finished turn produced
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub reply: String,
    pub mode: Mode,
    /// System prompt, history and every message the turn appended
    pub transcript: Vec<ConversationMessage>,
    /// Number of backend calls made
    pub iterations: usize,
    pub ended_by: TurnEnd,
}

enum TurnState {
    AwaitingModel,
    DispatchingTools(Vec<ToolCallRequest>),
    Done(TurnEnd, String),
}

/// Drives one user turn to a final reply
///
/// The model is called, any requested tools are dispatched in order, and their
/// results are fed back until the model answers with text or the iteration
/// bound is hit. Every turn yields a reply string.
pub struct ConversationDriver {
    backend: Arc<dyn ChatBackend>,
    dispatcher: Dispatcher,
    max_iterations: usize,
    offset: FixedOffset,
    fallbacks: FallbackMessages,
    logger: SharedLogger,
}

impl ConversationDriver {
    pub fn new(backend: Arc<dyn ChatBackend>, dispatcher: Dispatcher, logger: SharedLogger) -> Self {
        Self {
            backend,
            dispatcher,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            offset: utc_offset(420),
            fallbacks: FallbackMessages::default(),
            logger,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Offset used for the time shown to the model, in minutes east of UTC
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.offset = utc_offset(minutes);
        self
    }

    pub fn with_fallbacks(mut self, fallbacks: FallbackMessages) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run a turn and return only the reply text
    pub async fn run_turn(&self, request: TurnRequest) -> String {
        self.run_turn_detailed(request).await.reply
    }

    pub async fn run_turn_detailed(&self, request: TurnRequest) -> TurnReport {
        let TurnRequest {
            history,
            model,
            mode,
            project_id,
        } = request;

        let mode = match mode {
            ModeSelector::Auto => select_mode(&history),
            ModeSelector::Fixed(mode) => mode,
        };
        let tools = mode.tools();

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ConversationMessage::system(system_prompt(
            mode,
            &local_now(self.offset),
            project_id.as_deref(),
        )));
        messages.extend(history);

        log_info!(
            self.logger,
            "[ConversationDriver] Turn in {} mode via {} with {} messages",
            mode,
            self.backend.name(),
            messages.len()
        );

        let mut iterations = 0;
        let mut state = TurnState::AwaitingModel;
        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    if iterations >= self.max_iterations {
                        log_warn!(
                            self.logger,
                            "[ConversationDriver] Iteration limit {} reached",
                            self.max_iterations
                        );
                        TurnState::Done(TurnEnd::IterationLimit, self.fallbacks.finished.clone())
                    } else {
                        iterations += 1;
                        self.ask_model(&model, &mut messages, tools, iterations).await
                    }
                }
                TurnState::DispatchingTools(calls) => {
                    for call in &calls {
                        let outcome = self.dispatcher.dispatch_call(call).await;
                        let content = outcome.to_json().unwrap_or_else(|e| {
                            log_error!(self.logger, "[ConversationDriver] Unserializable outcome: {}", e);
                            json!({"success": false, "message": "Tool result could not be serialized"}).to_string()
                        });
                        messages.push(ConversationMessage::tool_result(call, content));
                    }
                    TurnState::AwaitingModel
                }
                TurnState::Done(ended_by, reply) => {
                    log_debug!(
                        self.logger,
                        "[ConversationDriver] Turn ended by {:?} after {} iterations",
                        ended_by,
                        iterations
                    );
                    return TurnReport {
                        reply,
                        mode,
                        transcript: messages,
                        iterations,
                        ended_by,
                    };
                }
            };
        }
    }

    async fn ask_model(
        &self,
        model: &str,
        messages: &mut Vec<ConversationMessage>,
        tools: &[ToolSpec],
        iteration: usize,
    ) -> TurnState {
        let result = self
            .backend
            .complete(&CompletionRequest::new(model, messages.as_slice(), tools))
            .await;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) if e.is_rejection() => {
                log_error!(self.logger, "[ConversationDriver] Backend rejected request: {}", e);
                return TurnState::Done(TurnEnd::BackendRejected, self.fallbacks.unavailable.clone());
            }
            Err(e) => {
                log_error!(self.logger, "[ConversationDriver] Backend call failed: {}", e);
                return TurnState::Done(TurnEnd::Failed, self.fallbacks.error.clone());
            }
        };

        if reply.has_tool_calls() {
            log_info!(
                self.logger,
                "[ConversationDriver] Iteration {}: {} tool call(s): {}",
                iteration,
                reply.tool_calls.len(),
                reply.tool_calls.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
            );
            let calls = reply.tool_calls;
            messages.push(ConversationMessage::assistant_tool_calls(reply.content, calls.clone()));
            return TurnState::DispatchingTools(calls);
        }

        match reply.content {
            Some(text) if !text.trim().is_empty() => TurnState::Done(TurnEnd::Reply, text),
            _ => TurnState::Done(TurnEnd::EmptyReply, self.fallbacks.nothing_to_add.clone()),
        }
    }
}
