//! Agent results
//!
//! An [`AgentResult`] is what one model invocation produced, possibly
//! replaced later by an output processor: the content, a metadata container
//! and an optional handle on the provider's raw response.

use super::stream::{Chunk, ChunkSource};
use crate::core::error::AgentError;
use crate::metadata::Metadata;
use crate::tool::entities::ToolCall;
use serde_json::Value;
use std::fmt;

/// Content of a result.
pub enum Content {
    Text(String),
    Structured(Value),
    /// The model asked for tool calls instead of answering.
    ToolCalls(Vec<ToolCall>),
    Empty,
    /// Lazily produced chunks.
    Stream(Box<dyn ChunkSource>),
}

impl Content {
    /// Discrete content as a single chunk; `None` for streams.
    pub fn into_chunk(self) -> Option<Chunk> {
        match self {
            Content::Text(text) => Some(Chunk::Text(text)),
            Content::Structured(value) => Some(Chunk::Structured(value)),
            Content::ToolCalls(calls) => Some(Chunk::tool_calls(calls)),
            Content::Empty => Some(Chunk::Empty),
            Content::Stream(_) => None,
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
            Content::ToolCalls(calls) => f.debug_tuple("ToolCalls").field(calls).finish(),
            Content::Empty => f.write_str("Empty"),
            Content::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Opaque handle on the provider's raw response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    payload: Value,
}

impl RawResult {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Result of an agent call.
#[derive(Debug)]
pub struct AgentResult {
    content: Content,
    metadata: Metadata,
    raw: Option<RawResult>,
}

impl AgentResult {
    pub fn new(content: Content) -> Self {
        Self {
            content,
            metadata: Metadata::new(),
            raw: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Content::Text(text.into()))
    }

    pub fn structured(value: Value) -> Self {
        Self::new(Content::Structured(value))
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::new(Content::ToolCalls(calls))
    }

    pub fn empty() -> Self {
        Self::new(Content::Empty)
    }

    pub fn stream(source: impl ChunkSource + 'static) -> Self {
        Self::new(Content::Stream(Box::new(source)))
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_raw(mut self, raw: RawResult) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Swap the content, returning the previous one.
    pub fn replace_content(&mut self, content: Content) -> Content {
        std::mem::replace(&mut self.content, content)
    }

    pub fn into_content(self) -> Content {
        self.content
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    pub fn raw(&self) -> Option<&RawResult> {
        self.raw.as_ref()
    }

    pub fn take_raw(&mut self) -> Option<RawResult> {
        self.raw.take()
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.content, Content::Stream(_))
    }

    /// Tool calls requested by a discrete result, if any.
    pub fn requested_tool_calls(&self) -> Option<&[ToolCall]> {
        match &self.content {
            Content::ToolCalls(calls) if !calls.is_empty() => Some(calls),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Pull the next chunk of a streamed result.
    ///
    /// Discrete results have no chunks and always return `None`.
    pub async fn next_chunk(&mut self) -> Option<Result<Chunk, AgentError>> {
        match &mut self.content {
            Content::Stream(source) => source.next_chunk(&mut self.metadata).await,
            _ => None,
        }
    }

    /// Stop consuming a streamed result, keeping the metadata its source
    /// would have reported at the end.
    pub fn finish_stream(&mut self) {
        if let Content::Stream(source) = &mut self.content {
            source.finish(&mut self.metadata);
        }
    }

    /// Drain a streamed result into a list of chunks.
    pub async fn collect_chunks(&mut self) -> Result<Vec<Chunk>, AgentError> {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            chunks.push(chunk?);
        }
        Ok(chunks)
    }

    /// Text of the result, draining the stream if there is one.
    pub async fn collect_text(&mut self) -> Result<String, AgentError> {
        if !self.is_stream() {
            return Ok(match &self.content {
                Content::Text(text) => text.clone(),
                Content::Structured(value) => value.to_string(),
                _ => String::new(),
            });
        }
        let mut text = String::new();
        while let Some(chunk) = self.next_chunk().await {
            match chunk? {
                Chunk::Text(delta) => text.push_str(&delta),
                Chunk::Structured(value) => text.push_str(&value.to_string()),
                Chunk::ToolCalls(_) | Chunk::Empty => {}
            }
        }
        Ok(text)
    }
}
