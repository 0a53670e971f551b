//! Tool value objects

use super::entities::ToolCall;
use super::source::SourceLedger;
use serde_json::Value;

/// Outcome of executing a [`ToolCall`].
///
/// The payload is whatever the tool returned; it becomes the content of a
/// tool message through [`ToolResult::message_content`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    tool_call: ToolCall,
    payload: Value,
    sources: Option<SourceLedger>,
}

impl ToolResult {
    pub fn new(tool_call: ToolCall, payload: impl Into<Value>) -> Self {
        Self {
            tool_call,
            payload: payload.into(),
            sources: None,
        }
    }

    pub fn with_sources(mut self, sources: SourceLedger) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn tool_call(&self) -> &ToolCall {
        &self.tool_call
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn sources(&self) -> Option<&SourceLedger> {
        self.sources.as_ref()
    }

    /// Text sent back to the model: strings pass through, null becomes
    /// empty, anything else is JSON-encoded.
    pub fn message_content(&self) -> String {
        match &self.payload {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
