//! Lazily produced result content.
//!
//! A streamed [`AgentResult`](super::response::AgentResult) owns a
//! [`ChunkSource`]. Consumers pull one [`Chunk`] at a time; producers may
//! write metadata (token usage, sources) into the result's container while
//! being pulled. Nothing happens between pulls, so dropping the result stops
//! all further work.

use crate::core::error::AgentError;
use crate::metadata::Metadata;
use crate::tool::entities::ToolCall;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;

/// Marker chunk: the model stopped generating text to request tool calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    calls: Vec<ToolCall>,
}

impl ToolCallResult {
    pub fn new(calls: Vec<ToolCall>) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> &[ToolCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<ToolCall> {
        self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// One element of a streamed result.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Text delta.
    Text(String),
    /// Tool-call marker.
    ToolCalls(ToolCallResult),
    /// A discrete structured value forwarded as a single element.
    Structured(Value),
    /// A discrete empty result forwarded as a single element.
    Empty,
}

impl Chunk {
    pub fn text(text: impl Into<String>) -> Self {
        Chunk::Text(text.into())
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Chunk::ToolCalls(ToolCallResult::new(calls))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Chunk::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_tool_calls(&self) -> bool {
        matches!(self, Chunk::ToolCalls(_))
    }
}

/// Pull-based producer of chunks.
///
/// `metadata` is the container of the result that owns this source.
/// Returning `None` ends the sequence; after an `Err` item the source must
/// not be pulled again.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self, metadata: &mut Metadata)
    -> Option<Result<Chunk, AgentError>>;

    /// Called when the consumer stops pulling before the end of the
    /// sequence. Metadata the source would report at the end is written
    /// into `metadata` now.
    fn finish(&mut self, _metadata: &mut Metadata) {}
}

/// A chunk source over a fixed sequence of items.
///
/// Trailing metadata is merged into the owning result once the queue has
/// been drained, the way providers report usage at the end of a stream.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    items: VecDeque<Result<Chunk, AgentError>>,
    trailing_metadata: Option<Metadata>,
}

impl ChunkQueue {
    pub fn new(chunks: impl IntoIterator<Item = Chunk>) -> Self {
        Self {
            items: chunks.into_iter().map(Ok).collect(),
            trailing_metadata: None,
        }
    }

    /// Queue an error after the chunks queued so far.
    pub fn with_error(mut self, error: AgentError) -> Self {
        self.items.push_back(Err(error));
        self
    }

    pub fn with_trailing_metadata(mut self, metadata: Metadata) -> Self {
        self.trailing_metadata = Some(metadata);
        self
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl ChunkSource for ChunkQueue {
    async fn next_chunk(
        &mut self,
        metadata: &mut Metadata,
    ) -> Option<Result<Chunk, AgentError>> {
        match self.items.pop_front() {
            Some(Err(error)) => {
                self.items.clear();
                Some(Err(error))
            }
            Some(item) => Some(item),
            None => {
                self.finish(metadata);
                None
            }
        }
    }

    fn finish(&mut self, metadata: &mut Metadata) {
        if let Some(trailing) = self.trailing_metadata.take() {
            metadata.merge(&trailing);
        }
    }
}
