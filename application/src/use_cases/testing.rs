//! Test doubles shared by the use case tests.

use crate::ports::platform::{Platform, PlatformError};
use crate::ports::tool_registry::{ToolFailure, ToolRegistry};
use async_trait::async_trait;
use loom_domain::{
    AgentResult, Chunk, ChunkQueue, Conversation, Metadata, RequestOptions, TOKEN_USAGE_KEY,
    TokenUsage, ToolCall, ToolDefinition, ToolResult,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded platform invocation
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub model: String,
    pub conversation: Conversation,
    pub options: RequestOptions,
}

/// Platform returning scripted results in order
pub(crate) struct ScriptedPlatform {
    responses: Mutex<VecDeque<Result<AgentResult, PlatformError>>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedPlatform {
    pub fn new(responses: Vec<Result<AgentResult, PlatformError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(results: Vec<AgentResult>) -> Self {
        Self::new(results.into_iter().map(Ok).collect())
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn invocation(&self, index: usize) -> Invocation {
        self.invocations.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Platform for ScriptedPlatform {
    async fn invoke(
        &self,
        model: &str,
        conversation: &Conversation,
        options: &RequestOptions,
    ) -> Result<AgentResult, PlatformError> {
        self.invocations.lock().unwrap().push(Invocation {
            model: model.to_string(),
            conversation: conversation.clone(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlatformError::Server("no more scripted responses".into())))
    }
}

type ToolHandler = dyn Fn(&ToolCall) -> Result<ToolResult, ToolFailure> + Send + Sync;

/// Registry with fixed tool names and a single handler
pub(crate) struct StubRegistry {
    tools: Vec<ToolDefinition>,
    handler: Box<ToolHandler>,
    executed: Mutex<Vec<ToolCall>>,
}

impl StubRegistry {
    pub fn new(
        names: &[&str],
        handler: impl Fn(&ToolCall) -> Result<ToolResult, ToolFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            tools: names
                .iter()
                .map(|name| ToolDefinition::new(*name, format!("{name} tool")))
                .collect(),
            handler: Box::new(handler),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Every known tool answers with a fixed payload; unknown names are not found.
    pub fn answering(names: &[&str], payload: &str) -> Self {
        let known: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let payload = payload.to_string();
        Self::new(names, move |call| {
            if known.contains(&call.name) {
                Ok(ToolResult::new(call.clone(), payload.clone()))
            } else {
                Err(ToolFailure::NotFound(call.clone()))
            }
        })
    }

    pub fn executed(&self) -> Vec<ToolCall> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRegistry for StubRegistry {
    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.clone()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolFailure> {
        self.executed.lock().unwrap().push(call.clone());
        (self.handler)(call)
    }
}

pub(crate) fn usage(prompt: u64, completion: u64) -> Metadata {
    Metadata::new().with(TOKEN_USAGE_KEY, TokenUsage::new(prompt, completion))
}

pub(crate) fn call(id: &str, name: &str) -> ToolCall {
    ToolCall::new(id, name)
}

pub(crate) fn stream_of(chunks: Vec<Chunk>) -> AgentResult {
    AgentResult::stream(ChunkQueue::new(chunks))
}
