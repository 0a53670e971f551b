//! Tool box
//!
//! [`ToolBox`] is an ordered, in-memory implementation of the
//! [`ToolRegistry`] port. Registration order is preserved because the
//! not-found message lists tools in that order.
//!
//! When two tools share a name the first registration wins; later ones are
//! ignored with a trace log.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use loom_application::{ToolFailure, ToolRegistry};
use loom_domain::{ToolCall, ToolDefinition, ToolResult};

use super::Tool;

/// Ordered registry of [`Tool`]s
#[derive(Default)]
pub struct ToolBox {
    /// Registered tools, in registration order
    tools: Vec<Arc<dyn Tool>>,
    /// Tool name -> index into `tools`
    index: HashMap<String, usize>,
}

impl ToolBox {
    /// Create an empty tool box
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(self, tool: T) -> Self {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.definition().name;
        if self.index.contains_key(&name) {
            tracing::trace!(tool = %name, "Tool already registered, ignoring duplicate");
            return self;
        }

        tracing::debug!(tool = %name, position = self.tools.len(), "Registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        self
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn tool_for(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).and_then(|&position| self.tools.get(position))
    }
}

impl std::fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBox")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[async_trait]
impl ToolRegistry for ToolBox {
    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolFailure> {
        let Some(tool) = self.tool_for(&call.name) else {
            return Err(ToolFailure::NotFound(call.clone()));
        };

        tracing::trace!(tool = %call.name, call_id = %call.id, "Dispatching tool call");
        let output = tool.call(call).await?;

        let result = ToolResult::new(call.clone(), output.payload);
        Ok(if output.sources.is_empty() {
            result
        } else {
            result.with_sources(output.sources)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ScriptedTool, ToolOutput};
    use loom_domain::Source;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echoes the text argument")
        }

        async fn call(&self, call: &ToolCall) -> Result<ToolOutput, ToolFailure> {
            let text = call.get_string("text").unwrap_or_default().to_string();
            Ok(ToolOutput::new(text)
                .with_source(Source::new("echo", "mem://echo", "echoed")))
        }
    }

    // ==================== Registration ====================

    #[test]
    fn test_registration_order_is_kept() {
        let toolbox = ToolBox::new()
            .register(ScriptedTool::replying("tool_b", "b"))
            .register(ScriptedTool::replying("tool_a", "a"))
            .register(Echo);

        assert_eq!(toolbox.len(), 3);
        assert_eq!(toolbox.tool_names(), vec!["tool_b", "tool_a", "echo"]);
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let toolbox = ToolBox::new()
            .register(ScriptedTool::replying("weather", "first"))
            .register(ScriptedTool::replying("weather", "second"));

        assert_eq!(toolbox.len(), 1);

        let result = toolbox
            .execute(&ToolCall::new("c1", "weather"))
            .await
            .unwrap();
        assert_eq!(result.payload(), &json!("first"));
    }

    #[test]
    fn test_empty_toolbox() {
        let toolbox = ToolBox::new();
        assert!(toolbox.is_empty());
        assert!(toolbox.tools().is_empty());
        assert!(!toolbox.has_tool("anything"));
    }

    // ==================== Execution ====================

    #[tokio::test]
    async fn test_execute_attaches_sources() {
        let toolbox = ToolBox::new().register(Echo);
        let call = ToolCall::new("c1", "echo").with_arg("text", "hello");

        let result = toolbox.execute(&call).await.unwrap();

        assert_eq!(result.payload(), &json!("hello"));
        assert_eq!(result.tool_call().id, "c1");
        let sources = result.sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.all()[0].reference(), "mem://echo");
    }

    #[tokio::test]
    async fn test_execute_without_sources() {
        let toolbox = ToolBox::new().register(ScriptedTool::replying("clock", "12:00"));

        let result = toolbox.execute(&ToolCall::new("c1", "clock")).await.unwrap();

        assert!(result.sources().is_none());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let toolbox = ToolBox::new().register(Echo);

        let failure = toolbox
            .execute(&ToolCall::new("c9", "missing"))
            .await
            .unwrap_err();

        assert!(matches!(failure, ToolFailure::NotFound(call) if call.name == "missing"));
    }
}
