//! Tool adapters
//!
//! A [`Tool`] is one callable capability. The [`ToolBox`] collects tools in
//! registration order and exposes them through the application's
//! [`ToolRegistry`](loom_application::ToolRegistry) port.
//!
//! # Usage
//!
//! ```ignore
//! use loom_infrastructure::tools::{ScriptedTool, ToolBox};
//!
//! let toolbox = ToolBox::new()
//!     .register(ScriptedTool::replying("weather", "Sunny today"))
//!     .register(ScriptedTool::replying("clock", "12:00"));
//!
//! assert_eq!(toolbox.tool_names(), vec!["weather", "clock"]);
//! ```

pub mod registry;
pub mod scripted;
pub mod subagent;

use async_trait::async_trait;
use loom_application::ToolFailure;
use loom_domain::{Source, SourceLedger, ToolCall, ToolDefinition};
use serde_json::Value;

pub use registry::ToolBox;
pub use scripted::ScriptedTool;
pub use subagent::SubagentTool;

/// What a tool hands back: a payload for the model and the sources it used.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub payload: Value,
    pub sources: SourceLedger,
}

impl ToolOutput {
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
            sources: SourceLedger::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.add(source);
        self
    }

    pub fn with_sources(mut self, sources: SourceLedger) -> Self {
        self.sources.extend_from(&sources);
        self
    }
}

/// A single callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Descriptor published to the model
    fn definition(&self) -> ToolDefinition;

    /// Run the tool for one call
    async fn call(&self, call: &ToolCall) -> Result<ToolOutput, ToolFailure>;
}
