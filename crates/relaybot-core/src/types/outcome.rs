//! Uniform tool result shape

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of any tool handler, serialized into the tool-result message
///
/// Every outcome carries `success`; anything handler-specific goes into
/// `extra` and is flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolOutcome {
    /// A successful outcome with a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data: None,
            extra: Map::new(),
        }
    }

    /// A successful outcome carrying data
    pub fn with_data(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            data: Some(data),
            extra: Map::new(),
        }
    }

    /// A failed outcome with a message for the model
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: None,
            data: None,
            extra: Map::new(),
        }
    }

    /// A failed outcome with a short error label and a longer message
    pub fn failure_with_error(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::failure(message)
        }
    }

    /// Set the message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the data payload
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach an extra top-level field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Encode for the `content` of a tool-result message
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
