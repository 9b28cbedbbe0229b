//! Tool-calling types exchanged with the conversational engine

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tool definition published to the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON schema for parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Tool call emitted by the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call ID
    #[serde(default)]
    pub id: String,
    /// Tool name
    pub name: String,
    /// Arguments (JSON)
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    /// Create a tool call without arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Add an argument
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Read an argument as text
    ///
    /// Numbers are accepted too, since models often emit apartment
    /// numbers unquoted.
    pub fn text_argument(&self, key: &str) -> Option<String> {
        match self.arguments.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
