//! Inbound thread conversion and system prompt assembly

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::tools::Mode;
use crate::types::{ConversationMessage, Role};

/// A message as it arrives from the chat thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl ThreadMessage {
    pub fn user(username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            username: Some(username.into()),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            username: None,
            content: content.into(),
        }
    }
}

/// Convert a thread into conversation history
///
/// Messages with blank content are dropped. User messages are prefixed with
/// `[username]: ` so the model can tell speakers apart; a user message without
/// a username is passed through unprefixed.
pub fn history_from_thread(thread: &[ThreadMessage]) -> Vec<ConversationMessage> {
    thread
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| match (m.role, &m.username) {
            (Role::User, Some(name)) => ConversationMessage::user(format!("[{}]: {}", name, m.content)),
            (Role::User, None) => ConversationMessage::user(m.content.clone()),
            // threads carry no tool traffic; anything bot-authored is assistant text
            (Role::Assistant | Role::Tool, _) => ConversationMessage::assistant(m.content.clone()),
            (Role::System, _) => ConversationMessage::system(m.content.clone()),
        })
        .collect()
}

/// `minutes` east of UTC as an offset; out-of-range values fall back to UTC
pub fn utc_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

/// Current time in the given offset
pub fn local_now(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// Human-readable timestamp shown to the model
pub fn format_time(time: &DateTime<FixedOffset>) -> String {
    time.format("%A, %d %B %Y %H:%M:%S (UTC%:z)").to_string()
}

/// The single system message of a turn
pub fn system_prompt(mode: Mode, now: &DateTime<FixedOffset>, project_id: Option<&str>) -> String {
    let mut prompt = mode.system_prompt(&format_time(now));
    if let Some(project) = project_id.filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!(
            "\n\nCONTEXT: You are working with Redmine Project ID: {}",
            project
        ));
    }
    prompt
}
