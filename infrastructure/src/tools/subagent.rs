//! Agent as a tool
//!
//! [`SubagentTool`] lets one agent delegate to another. The delegate's
//! answer becomes the tool payload and the sources attached to its result
//! become the tool's sources, so provenance flows up through nested agents.

use std::sync::Arc;

use async_trait::async_trait;
use loom_application::{Agent, ToolExecutionError, ToolFailure};
use loom_domain::{AgentError, Conversation, Message, RequestOptions, ToolCall, ToolDefinition};
use serde_json::json;

use super::{Tool, ToolOutput};

const MESSAGE_ARG: &str = "message";

pub struct SubagentTool {
    agent: Arc<Agent>,
    name: String,
    description: String,
}

impl SubagentTool {
    pub fn new(agent: Arc<Agent>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            agent,
            name: name.into(),
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for SubagentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(&self.name, &self.description).with_input_schema(json!({
            "type": "object",
            "properties": {
                MESSAGE_ARG: {
                    "type": "string",
                    "description": "The request to hand over to the agent",
                }
            },
            "required": [MESSAGE_ARG],
        }))
    }

    async fn call(&self, call: &ToolCall) -> Result<ToolOutput, ToolFailure> {
        let Some(message) = call.get_string(MESSAGE_ARG) else {
            return Err(ToolFailure::execution(ToolExecutionError::execution_failed(
                call,
                format!("missing \"{MESSAGE_ARG}\" argument"),
            )));
        };

        tracing::debug!(tool = %self.name, model = %self.agent.model(), "Delegating to subagent");
        let conversation = Conversation::new().with_message(Message::user(message));
        let failed = |error: AgentError| ToolFailure::execution(ToolExecutionError::execution_failed(call, error));

        let mut result = self
            .agent
            .call(conversation, RequestOptions::default())
            .await
            .map_err(failed)?;
        let content = result.collect_text().await.map_err(failed)?;

        let output = ToolOutput::new(content);
        Ok(match result.metadata().sources() {
            Some(sources) => output.with_sources(sources.clone()),
            None => output,
        })
    }
}
