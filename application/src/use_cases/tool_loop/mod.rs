//! Tool orchestration
//!
//! [`ToolOrchestrator`] is both an input and an output processor:
//!
//! - on input it publishes the registry's tool definitions, restricted to
//!   the names in the `tools` option when one is given;
//! - on output it resolves tool calls. A discrete result requesting tools
//!   runs the buffered loop to completion. A streamed result is wrapped in
//!   a [`SpliceEngine`] that runs one loop step per tool-call chunk, while
//!   the caller consumes the stream.
//!
//! # Loop
//!
//! ```text
//! tool calls ──▶ execute each (in order) ──▶ iterations += 1
//!      ▲                                        │
//!      │                          > max? ──▶ MaxIterationsExceeded
//!      │                                        │
//!      └──── result requests tools ◀── re-invoke model
//! ```
//!
//! Each executed call appends the assistant tool-call message and one tool
//! message per result to the conversation, and its sources to the request
//! ledger. Token usage of every intermediate invocation is aggregated into
//! the final result.

pub mod splice;

use crate::config::OrchestrationParams;
use crate::ports::processor::{
    AgentAware, AgentHandle, AgentSlot, Input, InputProcessor, ModelInvoker, Output,
    OutputProcessor,
};
use crate::ports::tool_registry::ToolRegistry;
use crate::use_cases::fault_tolerant::FaultTolerantRegistry;
use crate::use_cases::tool_helpers::tool_args_preview;
use async_trait::async_trait;
use loom_domain::{
    AgentError, AgentResult, Conversation, Message, Metadata, RequestOptions, SOURCES_KEY,
    SourceLedger, ToolCall, ToolCallResult,
};
use splice::{SpliceEngine, ToolCallHandler};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Processor resolving tool calls, buffered or streamed.
pub struct ToolOrchestrator {
    registry: Arc<FaultTolerantRegistry>,
    params: OrchestrationParams,
    agent: AgentSlot,
}

impl ToolOrchestrator {
    pub fn new(registry: Arc<dyn ToolRegistry>) -> Self {
        Self {
            registry: Arc::new(FaultTolerantRegistry::new(registry)),
            params: OrchestrationParams::default(),
            agent: AgentSlot::new(),
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &OrchestrationParams {
        &self.params
    }

    fn tool_loop(&self, output: &Output) -> Result<ToolLoop, AgentError> {
        Ok(ToolLoop {
            agent: self.agent.agent("ToolOrchestrator")?,
            registry: self.registry.clone(),
            model: output.model().to_string(),
            conversation: output.conversation().clone(),
            options: output.options().clone(),
            params: self.params.clone(),
            completed_iterations: 0,
        })
    }
}

impl AgentAware for ToolOrchestrator {
    fn set_agent(&self, agent: AgentHandle) {
        self.agent.bind(agent);
    }
}

#[async_trait]
impl InputProcessor for ToolOrchestrator {
    async fn process_input(&self, input: &mut Input) -> Result<(), AgentError> {
        let mut tools = self.registry.tools();
        if let Some(allowed) = &input.options().tools {
            tools.retain(|tool| allowed.contains(&tool.name));
        }
        if tools.is_empty() {
            return Ok(());
        }
        debug!(tools = tools.len(), "Publishing tool definitions");
        input.options_mut().tool_definitions = tools;
        Ok(())
    }

    fn as_agent_aware(&self) -> Option<&dyn AgentAware> {
        Some(self)
    }
}

#[async_trait]
impl OutputProcessor for ToolOrchestrator {
    async fn process_output(&self, output: &mut Output) -> Result<(), AgentError> {
        if output.result().is_stream() {
            let tool_loop = self.tool_loop(output)?;
            let upstream = output.take_result();
            output.set_result(SpliceEngine::wrap(upstream, Arc::new(tool_loop)));
            return Ok(());
        }

        let Some(calls) = output.result().requested_tool_calls().map(<[ToolCall]>::to_vec) else {
            return Ok(());
        };
        let tool_loop = self.tool_loop(output)?;
        let carried = output.take_result().metadata().clone();
        let resolved = tool_loop.run(calls, None, carried).await?;
        output.set_result(resolved);
        Ok(())
    }

    fn as_agent_aware(&self) -> Option<&dyn AgentAware> {
        Some(self)
    }
}

/// State of one request's tool loop.
///
/// A streamed continuation gets its own copy carrying the conversation so
/// far and the iterations already spent.
#[derive(Clone)]
struct ToolLoop {
    agent: Arc<dyn ModelInvoker>,
    registry: Arc<FaultTolerantRegistry>,
    model: String,
    conversation: Conversation,
    options: RequestOptions,
    params: OrchestrationParams,
    completed_iterations: usize,
}

impl ToolLoop {
    /// Execute `calls` and re-invoke the model until it stops requesting
    /// tools or answers with a stream.
    ///
    /// `carried` holds metadata of invocations already made for this step.
    async fn run(
        &self,
        mut calls: Vec<ToolCall>,
        assistant_context: Option<Message>,
        mut carried: Metadata,
    ) -> Result<AgentResult, AgentError> {
        let mut conversation = self.conversation.clone();
        if let Some(context) = assistant_context
            && !context.content.is_empty()
        {
            conversation.push(context);
        }
        let mut ledger = SourceLedger::new();
        let mut iterations = self.completed_iterations;

        loop {
            conversation.push(Message::assistant_tool_calls(calls.clone()));
            for call in &calls {
                debug!(
                    agent = %self.agent.name(),
                    tool = %call.name,
                    call_id = %call.id,
                    args = %tool_args_preview(call),
                    "Executing tool call"
                );
                let result = self.registry.execute(call).await?;
                if let Some(sources) = result.sources() {
                    ledger.extend_from(sources);
                }
                conversation.push(Message::tool(call, result.message_content()));
            }

            iterations += 1;
            if iterations > self.params.max_tool_iterations {
                warn!(
                    agent = %self.agent.name(),
                    limit = self.params.max_tool_iterations,
                    "Tool calling iteration limit exceeded"
                );
                return Err(AgentError::MaxIterationsExceeded(
                    self.params.max_tool_iterations,
                ));
            }

            info!(agent = %self.agent.name(), iteration = iterations, "Re-invoking model with tool results");
            let next = self
                .agent
                .invoke_model(&self.model, &conversation, &self.options)
                .await?;

            if next.is_stream() {
                let continuation = ToolLoop {
                    conversation,
                    completed_iterations: iterations,
                    ..self.clone()
                };
                let spliced = SpliceEngine::wrap(next, Arc::new(continuation));
                return Ok(self.finish(spliced, carried, ledger));
            }

            match next.requested_tool_calls() {
                Some(requested) => {
                    calls = requested.to_vec();
                    carried.merge(next.metadata());
                }
                None => return Ok(self.finish(next, carried, ledger)),
            }
        }
    }

    fn finish(&self, mut result: AgentResult, carried: Metadata, ledger: SourceLedger) -> AgentResult {
        let mut metadata = carried;
        metadata.merge(result.metadata());
        if self.params.include_sources && !ledger.is_empty() {
            metadata.merge_value(SOURCES_KEY, ledger);
        }
        result.set_metadata(metadata);
        result
    }
}

#[async_trait]
impl ToolCallHandler for ToolLoop {
    async fn handle(
        &self,
        calls: ToolCallResult,
        assistant_context: Message,
    ) -> Result<AgentResult, AgentError> {
        self.run(calls.into_calls(), Some(assistant_context), Metadata::new())
            .await
    }
}
