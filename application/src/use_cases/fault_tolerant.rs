//! Fault-tolerant tool execution
//!
//! [`FaultTolerantRegistry`] wraps a [`ToolRegistry`] so that the two
//! failures a model can recover from (calling an unknown tool, a tool that
//! failed) come back as ordinary tool results. Only unclassified failures
//! abort the request. Logging is left to the caller.

use crate::ports::tool_registry::{ToolFailure, ToolRegistry};
use loom_domain::{AgentError, ToolCall, ToolDefinition, ToolResult};
use std::sync::Arc;

pub struct FaultTolerantRegistry {
    inner: Arc<dyn ToolRegistry>,
}

impl FaultTolerantRegistry {
    pub fn new(inner: Arc<dyn ToolRegistry>) -> Self {
        Self { inner }
    }

    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.inner.tools()
    }

    /// Execute `call`, rendering recoverable failures as tool results.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, AgentError> {
        match self.inner.execute(call).await {
            Ok(result) => Ok(result),
            Err(ToolFailure::NotFound(missing)) => {
                let payload = format!(
                    "Tool \"{}\" was not found, please use one of these: {}",
                    missing.name,
                    self.inner.tool_names().join(", ")
                );
                Ok(ToolResult::new(missing, payload))
            }
            Err(ToolFailure::Execution(failure)) => {
                Ok(ToolResult::new(call.clone(), failure.tool_call_result()))
            }
            Err(ToolFailure::Other(source)) => Err(AgentError::ToolExecutionFailed {
                tool: call.name.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_registry::{ToolExecutionError, ToolExecutionFailure};
    use crate::use_cases::testing::{StubRegistry, call};
    use serde_json::{Value, json};

    /// Failure that renders its own payload
    #[derive(Debug, thiserror::Error)]
    #[error("custom failure")]
    struct CustomFailure;

    impl ToolExecutionFailure for CustomFailure {
        fn tool_call_result(&self) -> Value {
            json!({"error": "custom"})
        }
    }

    fn registry(stub: StubRegistry) -> FaultTolerantRegistry {
        FaultTolerantRegistry::new(Arc::new(stub))
    }

    #[tokio::test]
    async fn test_successful_call_passes_through() {
        let tools = registry(StubRegistry::answering(&["tool_foo"], "bar"));

        let result = tools.execute(&call("c1", "tool_foo")).await.unwrap();

        assert_eq!(result.payload(), &json!("bar"));
        assert_eq!(result.tool_call().id, "c1");
    }

    #[tokio::test]
    async fn test_execution_failure_renders_default_message() {
        let tools = registry(StubRegistry::new(&["tool_foo"], |call| {
            Err(ToolFailure::execution(ToolExecutionError::execution_failed(
                call,
                "connection refused",
            )))
        }));

        let result = tools.execute(&call("c1", "tool_foo")).await.unwrap();

        assert_eq!(
            result.message_content(),
            "An error occurred while executing tool \"tool_foo\"."
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_registered_tools_in_order() {
        let tools = registry(StubRegistry::answering(
            &["tool_no_params", "tool_required_params"],
            "ok",
        ));

        let result = tools.execute(&call("c1", "tool_xyz")).await.unwrap();

        assert_eq!(
            result.message_content(),
            "Tool \"tool_xyz\" was not found, please use one of these: tool_no_params, tool_required_params"
        );
    }

    #[tokio::test]
    async fn test_listing_follows_registration_order() {
        let tools = registry(StubRegistry::answering(&["zeta", "alpha"], "ok"));

        let result = tools.execute(&call("c1", "beta")).await.unwrap();

        assert!(result.message_content().ends_with("zeta, alpha"));
    }

    #[tokio::test]
    async fn test_custom_failure_renders_its_own_payload() {
        let tools = registry(StubRegistry::new(&["tool_foo"], |_| {
            Err(ToolFailure::execution(CustomFailure))
        }));

        let result = tools.execute(&call("c1", "tool_foo")).await.unwrap();

        assert_eq!(result.message_content(), r#"{"error":"custom"}"#);
    }

    #[tokio::test]
    async fn test_unclassified_failure_is_fatal() {
        let tools = registry(StubRegistry::new(&["tool_foo"], |_| {
            Err(ToolFailure::other("out of memory"))
        }));

        let err = tools.execute(&call("c1", "tool_foo")).await.unwrap_err();

        match err {
            AgentError::ToolExecutionFailed { tool, source } => {
                assert_eq!(tool, "tool_foo");
                assert_eq!(source.to_string(), "out of memory");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
