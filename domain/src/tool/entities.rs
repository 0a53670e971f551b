//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Definition of a tool advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "weather")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema of the arguments, when the registry knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// A tool invocation requested by the model.
///
/// The id is opaque and assigned by the model provider; it links the tool
/// message back to the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: HashMap<String, Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_arguments() {
        let call = ToolCall::new("call_1", "weather")
            .with_arg("city", "Berlin")
            .with_arg("days", 3)
            .with_arg("metric", true);

        assert_eq!(call.get_string("city"), Some("Berlin"));
        assert_eq!(call.get_i64("days"), Some(3));
        assert_eq!(call.get_bool("metric"), Some(true));
        assert_eq!(call.get_string("missing"), None);
    }

    #[test]
    fn test_tool_call_deserializes_without_arguments() {
        let call: ToolCall = serde_json::from_value(json!({"id": "c", "name": "clock"})).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_definition_schema_is_optional_on_the_wire() {
        let def = ToolDefinition::new("clock", "Current time");
        let value = serde_json::to_value(&def).unwrap();
        assert!(value.get("input_schema").is_none());

        let def = def.with_input_schema(json!({"type": "object"}));
        assert_eq!(def.input_schema, Some(json!({"type": "object"})));
    }
}
