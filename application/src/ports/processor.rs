//! Processor ports
//!
//! An agent runs its input processors in order before invoking the model,
//! then its output processors in order on the result. Processors that need
//! to call back into the agent (the tool loop re-invokes the model) expose
//! the [`AgentAware`] capability; the agent binds itself to them exactly
//! once, when it is built.

use async_trait::async_trait;
use loom_domain::{AgentError, AgentResult, Conversation, RequestOptions};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Request as seen by input processors.
#[derive(Debug, Clone)]
pub struct Input {
    model: String,
    conversation: Conversation,
    options: RequestOptions,
}

impl Input {
    pub fn new(model: impl Into<String>, conversation: Conversation, options: RequestOptions) -> Self {
        Self {
            model: model.into(),
            conversation,
            options,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }

    pub fn into_parts(self) -> (String, Conversation, RequestOptions) {
        (self.model, self.conversation, self.options)
    }
}

/// Invocation outcome as seen by output processors.
///
/// The conversation and options are the ones the model was invoked with,
/// after input processing. Output processors may replace the result.
#[derive(Debug)]
pub struct Output {
    model: String,
    result: AgentResult,
    conversation: Conversation,
    options: RequestOptions,
}

impl Output {
    pub fn new(
        model: impl Into<String>,
        result: AgentResult,
        conversation: Conversation,
        options: RequestOptions,
    ) -> Self {
        Self {
            model: model.into(),
            result,
            conversation,
            options,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn result(&self) -> &AgentResult {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut AgentResult {
        &mut self.result
    }

    pub fn set_result(&mut self, result: AgentResult) {
        self.result = result;
    }

    /// Move the result out, leaving an empty one behind.
    pub fn take_result(&mut self) -> AgentResult {
        std::mem::replace(&mut self.result, AgentResult::empty())
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn into_result(self) -> AgentResult {
        self.result
    }
}

/// What a bound processor may do with its agent.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    fn name(&self) -> &str;

    /// Invoke the model directly, without running any processor.
    async fn invoke_model(
        &self,
        model: &str,
        conversation: &Conversation,
        options: &RequestOptions,
    ) -> Result<AgentResult, AgentError>;
}

/// Non-owning reference from a processor back to its agent.
#[derive(Clone)]
pub struct AgentHandle {
    agent: Weak<dyn ModelInvoker>,
}

impl AgentHandle {
    pub fn new(agent: Weak<dyn ModelInvoker>) -> Self {
        Self { agent }
    }

    pub fn upgrade(&self) -> Result<Arc<dyn ModelInvoker>, AgentError> {
        self.agent
            .upgrade()
            .ok_or_else(|| AgentError::Misconfigured("the bound agent was dropped".to_string()))
    }
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle")
            .field("alive", &(self.agent.strong_count() > 0))
            .finish()
    }
}

/// Optional capability: receive the agent handle at registration.
pub trait AgentAware: Send + Sync {
    fn set_agent(&self, agent: AgentHandle);
}

/// Storage for the handle of an [`AgentAware`] processor.
///
/// The first binding wins; later ones are ignored.
#[derive(Debug, Default)]
pub struct AgentSlot {
    handle: OnceLock<AgentHandle>,
}

impl AgentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, handle: AgentHandle) {
        if self.handle.set(handle).is_err() {
            tracing::trace!("Processor already bound to an agent; keeping the first binding");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handle.get().is_some()
    }

    /// The bound agent, or `Misconfigured` naming the processor.
    pub fn agent(&self, processor: &str) -> Result<Arc<dyn ModelInvoker>, AgentError> {
        self.handle
            .get()
            .ok_or_else(|| {
                AgentError::Misconfigured(format!("{processor} is not bound to an agent"))
            })?
            .upgrade()
    }
}

/// Runs before the model is invoked; may rewrite model, conversation and options.
#[async_trait]
pub trait InputProcessor: Send + Sync {
    async fn process_input(&self, input: &mut Input) -> Result<(), AgentError>;

    fn as_agent_aware(&self) -> Option<&dyn AgentAware> {
        None
    }
}

/// Runs after the model was invoked; may replace the result.
#[async_trait]
pub trait OutputProcessor: Send + Sync {
    async fn process_output(&self, output: &mut Output) -> Result<(), AgentError>;

    fn as_agent_aware(&self) -> Option<&dyn AgentAware> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoInvoker;

    #[async_trait]
    impl ModelInvoker for EchoInvoker {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke_model(
            &self,
            model: &str,
            _conversation: &Conversation,
            _options: &RequestOptions,
        ) -> Result<AgentResult, AgentError> {
            Ok(AgentResult::text(model))
        }
    }

    #[test]
    fn test_unbound_slot_is_misconfigured() {
        let slot = AgentSlot::new();
        assert!(!slot.is_bound());
        let err = slot.agent("ToolOrchestrator").err().unwrap();
        assert!(matches!(err, AgentError::Misconfigured(_)));
        assert!(err.to_string().contains("ToolOrchestrator"));
    }

    #[test]
    fn test_slot_keeps_first_binding() {
        let first: Arc<dyn ModelInvoker> = Arc::new(EchoInvoker);
        let second: Arc<dyn ModelInvoker> = Arc::new(EchoInvoker);
        let slot = AgentSlot::new();

        slot.bind(AgentHandle::new(Arc::downgrade(&first)));
        slot.bind(AgentHandle::new(Arc::downgrade(&second)));

        let bound = slot.agent("test").unwrap();
        assert!(Arc::ptr_eq(&bound, &first));
    }

    #[test]
    fn test_dropped_agent_is_misconfigured() {
        let agent: Arc<dyn ModelInvoker> = Arc::new(EchoInvoker);
        let handle = AgentHandle::new(Arc::downgrade(&agent));
        drop(agent);

        assert!(matches!(handle.upgrade(), Err(AgentError::Misconfigured(_))));
    }

    #[test]
    fn test_output_take_result_leaves_empty() {
        let mut output = Output::new(
            "model",
            AgentResult::text("hi"),
            Conversation::new(),
            RequestOptions::new(),
        );
        let taken = output.take_result();

        assert_eq!(taken.as_text(), Some("hi"));
        assert!(matches!(output.result().content(), loom_domain::Content::Empty));
    }
}
