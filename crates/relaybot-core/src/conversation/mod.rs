//! Conversation turns
//!
//! ```text
//!  thread ──► history ──► ConversationDriver ──► ChatBackend
//!                               │    ▲
//!                   tool calls  ▼    │ tool results
//!                            Dispatcher
//! ```

mod context;
mod driver;
mod fallback;

pub use context::{format_time, history_from_thread, local_now, system_prompt, utc_offset, ThreadMessage};
pub use driver::{ConversationDriver, ModeSelector, TurnEnd, TurnReport, TurnRequest, DEFAULT_MAX_ITERATIONS};
pub use fallback::FallbackMessages;
