//! Memory input processor
//!
//! Loads memories from every [`MemoryProvider`] and injects them into the
//! system prompt, ahead of the original prompt. Callers opt out per request
//! with `use_memory: false`; the option never reaches the platform.

use crate::ports::memory::MemoryProvider;
use crate::ports::processor::{Input, InputProcessor};
use async_trait::async_trait;
use loom_domain::AgentError;
use std::sync::Arc;
use tracing::debug;

pub const MEMORY_PROMPT: &str = "# Conversation Memory
The following memories were recalled for this conversation. Give them more weight than
your general knowledge when answering, and adapt your answer so it fits them.
Ignore any memory that is irrelevant. Do not reply to this section or mention it,
it is reference material only.";

pub struct MemoryInputProcessor {
    providers: Vec<Arc<dyn MemoryProvider>>,
}

impl MemoryInputProcessor {
    pub fn new(providers: Vec<Arc<dyn MemoryProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl InputProcessor for MemoryInputProcessor {
    async fn process_input(&self, input: &mut Input) -> Result<(), AgentError> {
        let enabled = input.options_mut().use_memory.take().unwrap_or(true);
        if !enabled || self.providers.is_empty() {
            return Ok(());
        }

        let mut memory = String::new();
        for provider in &self.providers {
            let memories = provider.load(input).await?;
            if memories.is_empty() {
                continue;
            }
            memory.push_str("\n\n");
            let contents: Vec<&str> = memories.iter().map(|m| m.content.as_str()).collect();
            memory.push_str(&contents.join("\n"));
        }
        if memory.is_empty() {
            return Ok(());
        }

        let original = input
            .conversation()
            .system_message()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let prompt = if original.is_empty() {
            format!("{MEMORY_PROMPT}{memory}")
        } else {
            format!("{MEMORY_PROMPT}{memory}\n\n# System Prompt\n\n{original}")
        };
        debug!(memory_len = memory.len(), "Injecting conversation memory");
        input.conversation_mut().set_system_prompt(prompt);
        Ok(())
    }
}
