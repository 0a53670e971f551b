//! Agent error taxonomy
//!
//! Every failure that can reach the caller of an agent is one of these.
//! Tool-level failures that the model can recover from never show up here:
//! they are rendered into tool results and fed back into the conversation.

use thiserror::Error;

/// Default message used when a client-class platform error carries none.
pub const DEFAULT_INVALID_REQUEST_MESSAGE: &str = "Invalid request to model or platform";

/// Errors surfaced by an agent call or a streamed result.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The request was rejected: bad option combination or a client-class
    /// platform error. Never retried.
    #[error("{0}")]
    InvalidRequest(String),

    /// Server or transport failure while talking to the model.
    #[error("Failed to request model")]
    ModelUnavailable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A tool failed in a way the tool registry could not render as a result.
    #[error("Execution of tool \"{tool}\" failed with error: {source}")]
    ToolExecutionFailed {
        tool: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Maximum number of tool calling iterations ({0}) exceeded.")]
    MaxIterationsExceeded(usize),

    /// A processor was used without the collaborator it needs.
    #[error("Misconfigured agent: {0}")]
    Misconfigured(String),
}

impl AgentError {
    /// Build an `InvalidRequest`, falling back to the default message when
    /// the given one is empty.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            AgentError::InvalidRequest(DEFAULT_INVALID_REQUEST_MESSAGE.to_string())
        } else {
            AgentError::InvalidRequest(message)
        }
    }

    /// Whether the failure may succeed on a later attempt.
    ///
    /// Nothing in loom retries; this only informs callers.
    pub fn is_transient(&self) -> bool {
        matches!(self, AgentError::ModelUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_iterations_message() {
        let error = AgentError::MaxIterationsExceeded(3);
        assert_eq!(
            error.to_string(),
            "Maximum number of tool calling iterations (3) exceeded."
        );
    }

    #[test]
    fn test_invalid_request_falls_back_to_default_message() {
        assert_eq!(
            AgentError::invalid_request("").to_string(),
            DEFAULT_INVALID_REQUEST_MESSAGE
        );
        assert_eq!(
            AgentError::invalid_request("model not found").to_string(),
            "model not found"
        );
    }

    #[test]
    fn test_model_unavailable_is_transient() {
        let error = AgentError::ModelUnavailable {
            source: "connection reset".into(),
        };
        assert_eq!(error.to_string(), "Failed to request model");
        assert!(error.is_transient());
        assert!(!AgentError::MaxIterationsExceeded(1).is_transient());
    }

    #[test]
    fn test_tool_execution_failed_display() {
        let error = AgentError::ToolExecutionFailed {
            tool: "tool_foo".to_string(),
            source: "disk on fire".into(),
        };
        assert_eq!(
            error.to_string(),
            "Execution of tool \"tool_foo\" failed with error: disk on fire"
        );
    }
}
