//! Orchestration parameters for tool loop control.
//!
//! [`OrchestrationParams`] groups the static parameters of the tool loop run
//! by [`ToolOrchestrator`](crate::use_cases::tool_loop::ToolOrchestrator),
//! in both buffered and streaming mode.

use serde::{Deserialize, Serialize};

/// Tool loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum number of tool-calling iterations for one request.
    ///
    /// An iteration is one round of tool execution followed by a model
    /// re-invocation; exceeding the bound fails the request.
    pub max_tool_iterations: usize,
    /// Attach the collected sources to the final result metadata.
    pub include_sources: bool,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_tool_iterations: 10,
            include_sources: false,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn with_include_sources(mut self, include: bool) -> Self {
        self.include_sources = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestrationParams::default();
        assert_eq!(params.max_tool_iterations, 10);
        assert!(!params.include_sources);
    }

    #[test]
    fn test_builder() {
        let params = OrchestrationParams::default()
            .with_max_tool_iterations(3)
            .with_include_sources(true);

        assert_eq!(params.max_tool_iterations, 3);
        assert!(params.include_sources);
    }
}
