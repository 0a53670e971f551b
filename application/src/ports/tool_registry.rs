//! Tool Registry port
//!
//! Defines how the application layer lists and executes tools. Tool
//! registration and discovery belong to the adapters.

use async_trait::async_trait;
use loom_domain::{ToolCall, ToolDefinition, ToolResult};
use serde_json::Value;
use thiserror::Error;

/// A tool failure that knows how to present itself to the model.
///
/// The fault-tolerant registry turns these into regular tool results, so
/// the model can react to the failure instead of the request failing.
pub trait ToolExecutionFailure: std::error::Error + Send + Sync {
    /// Payload fed back to the model in place of the tool output.
    fn tool_call_result(&self) -> Value;
}

/// Default execution failure.
///
/// Renders a generic message so internal error details never reach the
/// model.
#[derive(Error, Debug)]
#[error("Execution of tool \"{}\" failed with error: {message}", .call.name)]
pub struct ToolExecutionError {
    call: ToolCall,
    message: String,
}

impl ToolExecutionError {
    pub fn execution_failed(call: &ToolCall, cause: impl std::fmt::Display) -> Self {
        Self {
            call: call.clone(),
            message: cause.to_string(),
        }
    }

    pub fn tool_call(&self) -> &ToolCall {
        &self.call
    }
}

impl ToolExecutionFailure for ToolExecutionError {
    fn tool_call_result(&self) -> Value {
        Value::String(format!(
            "An error occurred while executing tool \"{}\".",
            self.call.name
        ))
    }
}

/// Errors a registry may return from [`ToolRegistry::execute`]
#[derive(Error, Debug)]
pub enum ToolFailure {
    #[error("Tool not found for call: {} ({})", .0.name, .0.id)]
    NotFound(ToolCall),

    #[error("{0}")]
    Execution(Box<dyn ToolExecutionFailure>),

    /// Anything the registry does not classify. Fatal for the request.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ToolFailure {
    pub fn execution(failure: impl ToolExecutionFailure + 'static) -> Self {
        ToolFailure::Execution(Box::new(failure))
    }

    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ToolFailure::Other(error.into())
    }
}

/// Port for tool listing and execution
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Tool definitions, in registration order
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Names of all registered tools, in registration order
    fn tool_names(&self) -> Vec<String> {
        self.tools().into_iter().map(|tool| tool.name).collect()
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolFailure>;
}
