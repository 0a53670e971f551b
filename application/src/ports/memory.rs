//! Memory port
//!
//! Memory providers contribute context that is injected ahead of the system
//! prompt before the model is invoked.

use crate::ports::processor::Input;
use async_trait::async_trait;
use loom_domain::AgentError;

/// A piece of remembered context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    pub content: String,
}

impl Memory {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Source of memories for a request.
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Memories relevant to `input`, most relevant first.
    async fn load(&self, input: &Input) -> Result<Vec<Memory>, AgentError>;
}
