//! Static memory provider

use async_trait::async_trait;
use loom_application::{Input, Memory, MemoryProvider};
use loom_domain::AgentError;

/// Returns the same memories for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticMemoryProvider {
    memories: Vec<Memory>,
}

impl StaticMemoryProvider {
    pub fn new<I, S>(memories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            memories: memories.into_iter().map(Memory::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

#[async_trait]
impl MemoryProvider for StaticMemoryProvider {
    async fn load(&self, _input: &Input) -> Result<Vec<Memory>, AgentError> {
        Ok(self.memories.clone())
    }
}
