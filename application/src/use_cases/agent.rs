//! Agent use case
//!
//! [`Agent`] is the single entry point of loom. A call runs the input
//! processors in order, invokes the model through the [`Platform`] port,
//! then runs the output processors in order on the result.
//!
//! Platform failures are classified here: client-class errors become
//! [`AgentError::InvalidRequest`], everything else
//! [`AgentError::ModelUnavailable`]. Nothing is retried.

use crate::ports::platform::{Platform, PlatformError};
use crate::ports::processor::{
    AgentHandle, Input, InputProcessor, ModelInvoker, Output, OutputProcessor,
};
use async_trait::async_trait;
use loom_domain::{AgentError, AgentResult, Conversation, RequestOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// Name used when none is configured
pub const DEFAULT_AGENT_NAME: &str = "agent";

/// A model bound to a platform and a processor pipeline.
pub struct Agent {
    name: String,
    model: String,
    platform: Arc<dyn Platform>,
    input_processors: Vec<Arc<dyn InputProcessor>>,
    output_processors: Vec<Arc<dyn OutputProcessor>>,
}

impl Agent {
    pub fn builder(platform: Arc<dyn Platform>, model: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(platform, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the full pipeline for one request.
    pub async fn call(
        &self,
        conversation: Conversation,
        options: RequestOptions,
    ) -> Result<AgentResult, AgentError> {
        let mut input = Input::new(self.model.clone(), conversation, options);
        for processor in &self.input_processors {
            processor.process_input(&mut input).await?;
        }

        let (model, conversation, options) = input.into_parts();
        debug!(
            agent = %self.name,
            model = %model,
            stream = options.stream,
            messages = conversation.len(),
            tools = options.tool_definitions.len(),
            "Invoking model"
        );
        let result = self.invoke_model(&model, &conversation, &options).await?;

        let mut output = Output::new(model, result, conversation, options);
        for processor in &self.output_processors {
            processor.process_output(&mut output).await?;
        }
        Ok(output.into_result())
    }

    fn classify(&self, error: PlatformError) -> AgentError {
        match error {
            PlatformError::Client { message, details } => {
                debug!(
                    agent = %self.name,
                    details = ?details,
                    "Platform rejected the request: {}",
                    message
                );
                AgentError::invalid_request(message)
            }
            other => {
                warn!(agent = %self.name, error = %other, "Model request failed");
                AgentError::ModelUnavailable {
                    source: Box::new(other),
                }
            }
        }
    }
}

#[async_trait]
impl ModelInvoker for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke_model(
        &self,
        model: &str,
        conversation: &Conversation,
        options: &RequestOptions,
    ) -> Result<AgentResult, AgentError> {
        self.platform
            .invoke(model, conversation, options)
            .await
            .map_err(|error| self.classify(error))
    }
}

/// Builder for [`Agent`]
///
/// Processors that expose the agent-aware capability are bound to the
/// agent in [`build`](AgentBuilder::build), once.
pub struct AgentBuilder {
    name: String,
    model: String,
    platform: Arc<dyn Platform>,
    input_processors: Vec<Arc<dyn InputProcessor>>,
    output_processors: Vec<Arc<dyn OutputProcessor>>,
}

impl AgentBuilder {
    pub fn new(platform: Arc<dyn Platform>, model: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            model: model.into(),
            platform,
            input_processors: Vec::new(),
            output_processors: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_input_processor(mut self, processor: Arc<dyn InputProcessor>) -> Self {
        self.input_processors.push(processor);
        self
    }

    pub fn with_output_processor(mut self, processor: Arc<dyn OutputProcessor>) -> Self {
        self.output_processors.push(processor);
        self
    }

    pub fn build(self) -> Arc<Agent> {
        let agent = Arc::new(Agent {
            name: self.name,
            model: self.model,
            platform: self.platform,
            input_processors: self.input_processors,
            output_processors: self.output_processors,
        });

        let invoker: Arc<dyn ModelInvoker> = agent.clone();
        let handle = AgentHandle::new(Arc::downgrade(&invoker));
        let aware = agent
            .input_processors
            .iter()
            .filter_map(|p| p.as_agent_aware())
            .chain(agent.output_processors.iter().filter_map(|p| p.as_agent_aware()));
        for processor in aware {
            processor.set_agent(handle.clone());
        }

        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::processor::{AgentAware, AgentSlot};
    use crate::use_cases::testing::ScriptedPlatform;
    use loom_domain::{DEFAULT_INVALID_REQUEST_MESSAGE, Message};
    use serde_json::json;
    use std::sync::Mutex;

    /// Appends its tag to the system prompt and records the order it ran in
    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl InputProcessor for Tagger {
        async fn process_input(&self, input: &mut Input) -> Result<(), AgentError> {
            self.log.lock().unwrap().push(format!("in:{}", self.tag));
            let prompt = input
                .conversation()
                .system_message()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            input
                .conversation_mut()
                .set_system_prompt(format!("{prompt}{}", self.tag));
            Ok(())
        }
    }

    #[async_trait]
    impl OutputProcessor for Tagger {
        async fn process_output(&self, output: &mut Output) -> Result<(), AgentError> {
            self.log.lock().unwrap().push(format!("out:{}", self.tag));
            let text = output.result().as_text().unwrap_or_default().to_string();
            output.set_result(AgentResult::text(format!("{text}{}", self.tag)));
            Ok(())
        }
    }

    struct Aware {
        slot: AgentSlot,
    }

    impl AgentAware for Aware {
        fn set_agent(&self, agent: AgentHandle) {
            self.slot.bind(agent);
        }
    }

    #[async_trait]
    impl InputProcessor for Aware {
        async fn process_input(&self, _input: &mut Input) -> Result<(), AgentError> {
            Ok(())
        }

        fn as_agent_aware(&self) -> Option<&dyn AgentAware> {
            Some(self)
        }
    }

    fn conversation() -> Conversation {
        Conversation::new().with_message(Message::user("What's up?"))
    }

    #[tokio::test]
    async fn test_processors_run_in_configured_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = Arc::new(Tagger { tag: "A", log: log.clone() });
        let b = Arc::new(Tagger { tag: "B", log: log.clone() });
        let platform = Arc::new(ScriptedPlatform::replying(vec![AgentResult::text("hi")]));

        let agent = Agent::builder(platform.clone(), "gpt-test")
            .with_input_processor(a.clone())
            .with_input_processor(b.clone())
            .with_output_processor(b)
            .with_output_processor(a)
            .build();

        let result = agent.call(conversation(), RequestOptions::new()).await.unwrap();

        assert_eq!(result.as_text(), Some("hiBA"));
        assert_eq!(*log.lock().unwrap(), vec!["in:A", "in:B", "out:B", "out:A"]);
        let sent = platform.invocation(0);
        assert_eq!(sent.conversation.system_message().unwrap().content, "AB");
        assert_eq!(sent.model, "gpt-test");
    }

    #[tokio::test]
    async fn test_options_reach_the_platform() {
        let platform = Arc::new(ScriptedPlatform::replying(vec![AgentResult::text("ok")]));
        let agent = Agent::builder(platform.clone(), "m").build();

        agent
            .call(conversation(), RequestOptions::new().with_option("temperature", 0.5))
            .await
            .unwrap();

        assert_eq!(
            platform.invocation(0).options.option("temperature"),
            Some(&json!(0.5))
        );
    }

    #[tokio::test]
    async fn test_client_error_becomes_invalid_request() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Err(PlatformError::Client {
            message: "Unsupported parameter: temperature".to_string(),
            details: Some(json!({"param": "temperature"})),
        })]));
        let agent = Agent::builder(platform, "m").build();

        let err = agent.call(conversation(), RequestOptions::new()).await.unwrap_err();

        assert!(matches!(err, AgentError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "Unsupported parameter: temperature");
    }

    #[tokio::test]
    async fn test_client_error_without_message_uses_default() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Err(PlatformError::client(""))]));
        let agent = Agent::builder(platform, "m").build();

        let err = agent.call(conversation(), RequestOptions::new()).await.unwrap_err();

        assert_eq!(err.to_string(), DEFAULT_INVALID_REQUEST_MESSAGE);
    }

    #[tokio::test]
    async fn test_server_error_becomes_model_unavailable() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Err(PlatformError::Server(
            "502 Bad Gateway".to_string(),
        ))]));
        let agent = Agent::builder(platform.clone(), "m").build();

        let err = agent.call(conversation(), RequestOptions::new()).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to request model");
        assert!(err.is_transient());
        assert_eq!(platform.invocation_count(), 1);
    }

    #[test]
    fn test_agent_aware_processors_are_bound_at_build() {
        let aware = Arc::new(Aware { slot: AgentSlot::new() });
        let platform = Arc::new(ScriptedPlatform::replying(vec![]));

        let agent = Agent::builder(platform, "m")
            .with_name("weather-bot")
            .with_input_processor(aware.clone())
            .build();

        let bound = aware.slot.agent("Aware").unwrap();
        assert_eq!(bound.name(), "weather-bot");
        assert_eq!(agent.model(), "m");
    }

    #[test]
    fn test_default_name() {
        let platform = Arc::new(ScriptedPlatform::replying(vec![]));
        let agent = Agent::builder(platform, "m").build();
        assert_eq!(agent.name(), DEFAULT_AGENT_NAME);
    }
}
