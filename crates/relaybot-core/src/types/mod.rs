//! Core types for conversations and tool calls
//!
//! This module contains the shared types used by the driver, dispatcher and backends.

mod message;
mod outcome;
mod tool;

pub use message::{ConversationMessage, FunctionCall, Role, ToolCallRequest};
pub use outcome::ToolOutcome;
pub use tool::{FunctionTool, ParameterSchema, PropertySchema, PropertyType, ToolDefinition, ToolSpec};
