//! Tool/function calling types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema primitive type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Schema for one named parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Allowed values, if constrained
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<Value>,
}

impl PropertySchema {
    pub fn new(kind: PropertyType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            allowed: Vec::new(),
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(PropertyType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Integer, description)
    }

    /// Constrain the parameter to a fixed set of values
    pub fn with_enum<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Object schema describing a function's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self {
            kind: PropertyType::Object,
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

/// Function tool definition offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Parameter schema
    pub parameters: ParameterSchema,
}

impl ToolDefinition {
    /// Create a tool definition with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::default(),
        }
    }

    /// Add an optional parameter
    pub fn param(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.parameters.properties.insert(name.into(), schema);
        self
    }

    /// Add a required parameter
    pub fn required(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        self.parameters.required.push(name.clone());
        self.parameters.properties.insert(name, schema);
        self
    }

    /// Whether `name` is listed as required
    pub fn is_required(&self, name: &str) -> bool {
        self.parameters.required.iter().any(|r| r == name)
    }
}

/// Wrapper giving a function definition its `{"type":"function"}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolDefinition,
}

/// One entry of the `tools` array sent to the backend
///
/// Built-in tools are provider features addressed by name only, serialized as
/// `{"google_search": {}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolSpec {
    Function(FunctionTool),
    Builtin(BTreeMap<String, Value>),
}

impl ToolSpec {
    /// Wrap a function definition
    pub fn function(definition: ToolDefinition) -> Self {
        ToolSpec::Function(FunctionTool {
            kind: "function".to_string(),
            function: definition,
        })
    }

    /// A provider built-in tool such as `google_search`
    pub fn builtin(name: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), Value::Object(Default::default()));
        ToolSpec::Builtin(map)
    }

    /// The tool's name
    pub fn name(&self) -> &str {
        match self {
            ToolSpec::Function(f) => &f.function.name,
            ToolSpec::Builtin(map) => map.keys().next().map(String::as_str).unwrap_or_default(),
        }
    }

    /// The function definition, if this is a function tool
    pub fn definition(&self) -> Option<&ToolDefinition> {
        match self {
            ToolSpec::Function(f) => Some(&f.function),
            ToolSpec::Builtin(_) => None,
        }
    }
}
