//! Scripted tools
//!
//! Tools whose behavior is fixed up front, typically from a scenario file:
//!
//! ```toml
//! [[tools]]
//! name = "weather"
//! description = "Current weather for a city"
//! payload = "Sunny in {city}"
//! sources = [{ name = "Forecast", reference = "https://weather.example/{city}", content = "sunny" }]
//! ```
//!
//! String payloads may reference call arguments as `{name}`.

use async_trait::async_trait;
use loom_application::{ToolExecutionError, ToolFailure};
use loom_domain::{Source, ToolCall, ToolDefinition};
use serde::Deserialize;
use serde_json::Value;

use super::{Tool, ToolOutput};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedTool {
    name: String,
    #[serde(default)]
    description: String,
    /// JSON schema of the arguments, published as-is
    #[serde(default)]
    parameters: Option<Value>,
    #[serde(default)]
    payload: Value,
    #[serde(default)]
    sources: Vec<Source>,
    /// When set, every call fails with this message
    #[serde(default)]
    fail: Option<String>,
    /// Report failures as unrecognised errors instead of execution failures
    #[serde(default)]
    fatal: bool,
}

impl ScriptedTool {
    pub fn replying(name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: None,
            payload: payload.into(),
            sources: Vec::new(),
            fail: None,
            fatal: false,
        }
    }

    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Self::replying(name, Value::Null)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Replace `{key}` placeholders with the call's string or number arguments.
fn render(template: &str, call: &ToolCall) -> String {
    let mut rendered = template.to_string();
    for (key, value) in &call.arguments {
        let replacement = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        rendered = rendered.replace(&format!("{{{key}}}"), &replacement);
    }
    rendered
}

#[async_trait]
impl Tool for ScriptedTool {
    fn definition(&self) -> ToolDefinition {
        let definition = ToolDefinition::new(&self.name, &self.description);
        match &self.parameters {
            Some(schema) => definition.with_input_schema(schema.clone()),
            None => definition,
        }
    }

    async fn call(&self, call: &ToolCall) -> Result<ToolOutput, ToolFailure> {
        if let Some(message) = &self.fail {
            let message = render(message, call);
            return Err(if self.fatal {
                ToolFailure::other(message)
            } else {
                ToolFailure::execution(ToolExecutionError::execution_failed(call, message))
            });
        }

        let payload = match &self.payload {
            Value::String(template) => Value::String(render(template, call)),
            other => other.clone(),
        };

        Ok(self.sources.iter().fold(ToolOutput::new(payload), |output, source| {
            output.with_source(Source::new(
                source.name(),
                render(source.reference(), call),
                source.content(),
            ))
        }))
    }
}
