//! Agent configuration from TOML (`[agent]` section)

use super::{ConfigIssue, ConfigIssueCode, Severity};
use loom_application::{DEFAULT_AGENT_NAME, OrchestrationParams};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// name = "weather-bot"
/// model = "gpt-4o-mini"
/// max_tool_iterations = 5
/// include_sources = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Agent name used in logs
    pub name: String,
    /// Model identifier passed to the platform
    pub model: String,
    /// Maximum tool-calling iterations per request
    pub max_tool_iterations: usize,
    /// Attach tool sources to result metadata
    pub include_sources: bool,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            model: "scripted".to_string(),
            max_tool_iterations: params.max_tool_iterations,
            include_sources: params.include_sources,
        }
    }
}

impl FileAgentConfig {
    pub fn to_params(&self) -> OrchestrationParams {
        OrchestrationParams::default()
            .with_max_tool_iterations(self.max_tool_iterations)
            .with_include_sources(self.include_sources)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyValue {
                    field: "agent.name".to_string(),
                },
                message: format!("agent.name is empty, logs will use \"{DEFAULT_AGENT_NAME}\""),
            });
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::EmptyValue {
                    field: "agent.model".to_string(),
                },
                message: "agent.model cannot be empty".to_string(),
            });
        }
        if self.max_tool_iterations == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::ZeroIterationLimit,
                message: "agent.max_tool_iterations is 0, every tool call will fail the request"
                    .to_string(),
            });
        }
        issues
    }

    /// Name to use, falling back to the default for blank values.
    pub fn effective_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_AGENT_NAME
        } else {
            &self.name
        }
    }
}
