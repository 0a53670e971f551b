//! Scenario files
//!
//! A scenario scripts one request end to end: the prompt, the model turns
//! the in-memory platform will serve, and the canned tools the model may
//! call. Running a scenario exercises the real agent pipeline (memory,
//! structured output and tool orchestration) without a provider.
//!
//! ```toml
//! system = "You are a helpful assistant."
//! prompt = "What is the weather in Berlin?"
//!
//! [[turns]]
//! text = "Let me check."
//! usage = { prompt = 20, completion = 5 }
//! [[turns.tool_calls]]
//! id = "call_1"
//! name = "weather"
//! arguments = { city = "Berlin" }
//!
//! [[turns]]
//! text = "It is sunny in Berlin."
//!
//! [[tools]]
//! name = "weather"
//! payload = "Sunny in {city}"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use loom_application::{
    Agent, InputProcessor, MemoryInputProcessor, MemoryProvider, OutputProcessor, Platform,
    StructuredOutputProcessor, ToolOrchestrator,
};
use loom_domain::{Conversation, Message, RequestOptions};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::FileAgentConfig;
use crate::memory::StaticMemoryProvider;
use crate::platform::{InMemoryPlatform, ScriptedTurn};
use crate::structured::SchemaRegistry;
use crate::tools::{ScriptedTool, ToolBox};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Scenario has no model turns")]
    NoTurns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub system: Option<String>,
    pub prompt: String,
    /// Overrides the configured model id
    #[serde(default)]
    pub model: Option<String>,
    /// Restricts the tools published to the model
    #[serde(default)]
    pub allowed_tools: Option<Vec<String>>,
    #[serde(default)]
    pub output_structure: Option<String>,
    #[serde(default)]
    pub use_memory: Option<bool>,
    #[serde(default)]
    pub memories: Vec<String>,
    /// Output structure name -> JSON schema
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
    #[serde(default)]
    pub turns: Vec<ScriptedTurn>,
    #[serde(default)]
    pub tools: Vec<ScriptedTool>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            turns = scenario.turns.len(),
            tools = scenario.tools.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(content)?;
        if scenario.turns.is_empty() {
            return Err(ScenarioError::NoTurns);
        }
        Ok(scenario)
    }

    pub fn conversation(&self) -> Conversation {
        let conversation = match &self.system {
            Some(system) => Conversation::new().with_message(Message::system(system)),
            None => Conversation::new(),
        };
        conversation.with_message(Message::user(&self.prompt))
    }

    pub fn options(&self, stream: bool) -> RequestOptions {
        let mut options = RequestOptions::default().with_stream(stream);
        if let Some(names) = &self.allowed_tools {
            options = options.with_tools(names.iter().cloned());
        }
        if let Some(structure) = &self.output_structure {
            options = options.with_output_structure(structure);
        }
        if let Some(use_memory) = self.use_memory {
            options = options.with_use_memory(use_memory);
        }
        options
    }

    pub fn platform(&self) -> InMemoryPlatform {
        InMemoryPlatform::new(self.turns.iter().cloned())
    }

    pub fn toolbox(&self) -> ToolBox {
        self.tools
            .iter()
            .cloned()
            .fold(ToolBox::new(), |toolbox, tool| toolbox.register(tool))
    }

    pub fn memory_provider(&self) -> StaticMemoryProvider {
        StaticMemoryProvider::new(self.memories.iter().cloned())
    }

    pub fn schema_registry(&self) -> SchemaRegistry {
        self.schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect()
    }

    /// Wire an agent for this scenario.
    ///
    /// Input runs memory, then structured output, then tool publishing.
    /// Output resolves tool calls before decoding structured content.
    pub fn build_agent(&self, platform: Arc<dyn Platform>, config: &FileAgentConfig) -> Arc<Agent> {
        let model = self.model.clone().unwrap_or_else(|| config.model.clone());
        let memory: Arc<dyn MemoryProvider> = Arc::new(self.memory_provider());
        let structured = Arc::new(StructuredOutputProcessor::new(Arc::new(self.schema_registry())));
        let orchestrator =
            Arc::new(ToolOrchestrator::new(Arc::new(self.toolbox())).with_params(config.to_params()));

        Agent::builder(platform, model)
            .with_name(config.effective_name())
            .with_input_processor(Arc::new(MemoryInputProcessor::new(vec![memory])))
            .with_input_processor(structured.clone() as Arc<dyn InputProcessor>)
            .with_input_processor(orchestrator.clone() as Arc<dyn InputProcessor>)
            .with_output_processor(orchestrator as Arc<dyn OutputProcessor>)
            .with_output_processor(structured as Arc<dyn OutputProcessor>)
            .build()
    }
}
