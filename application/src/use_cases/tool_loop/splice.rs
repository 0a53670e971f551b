//! Stream splicing
//!
//! [`SpliceEngine`] is a [`ChunkSource`] over an upstream streamed result.
//! Text chunks pass through and are buffered. When a tool-call chunk shows
//! up, the buffered text becomes the assistant context handed to a
//! [`ToolCallHandler`], whose result is spliced into the output in place of
//! the rest of the upstream: a streamed result chunk by chunk, a discrete
//! one as a single chunk. Upstream is never pulled again after that.
//!
//! Metadata of the spliced result, then of the upstream, is merged into the
//! container of the result owning the engine when the engine finishes.

use async_trait::async_trait;
use loom_domain::{
    AgentError, AgentResult, Chunk, ChunkSource, Content, Message, Metadata, ToolCallResult,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Turns the tool calls found in a stream into a continuation result.
#[async_trait]
pub trait ToolCallHandler: Send + Sync {
    /// `assistant_context` holds the text streamed before the tool calls.
    async fn handle(
        &self,
        calls: ToolCallResult,
        assistant_context: Message,
    ) -> Result<AgentResult, AgentError>;
}

enum SplicePhase {
    Upstream,
    Inner(AgentResult),
    Done,
}

pub struct SpliceEngine {
    upstream: AgentResult,
    handler: Arc<dyn ToolCallHandler>,
    buffer: String,
    phase: SplicePhase,
}

impl SpliceEngine {
    pub fn new(upstream: AgentResult, handler: Arc<dyn ToolCallHandler>) -> Self {
        Self {
            upstream,
            handler,
            buffer: String::new(),
            phase: SplicePhase::Upstream,
        }
    }

    /// Wrap a streamed result; the raw handle moves to the wrapper.
    pub fn wrap(mut upstream: AgentResult, handler: Arc<dyn ToolCallHandler>) -> AgentResult {
        let raw = upstream.take_raw();
        let spliced = AgentResult::stream(Self::new(upstream, handler));
        match raw {
            Some(raw) => spliced.with_raw(raw),
            None => spliced,
        }
    }

    fn close(&mut self, metadata: &mut Metadata) {
        self.upstream.finish_stream();
        metadata.merge(self.upstream.metadata());
    }
}

#[async_trait]
impl ChunkSource for SpliceEngine {
    async fn next_chunk(
        &mut self,
        metadata: &mut Metadata,
    ) -> Option<Result<Chunk, AgentError>> {
        loop {
            match std::mem::replace(&mut self.phase, SplicePhase::Done) {
                SplicePhase::Done => return None,

                SplicePhase::Inner(mut inner) => {
                    return match inner.next_chunk().await {
                        Some(Ok(chunk)) => {
                            self.phase = SplicePhase::Inner(inner);
                            Some(Ok(chunk))
                        }
                        Some(Err(error)) => Some(Err(error)),
                        None => {
                            metadata.merge(inner.metadata());
                            self.close(metadata);
                            None
                        }
                    };
                }

                SplicePhase::Upstream => match self.upstream.next_chunk().await {
                    None => {
                        self.close(metadata);
                        return None;
                    }
                    Some(Err(error)) => return Some(Err(error)),
                    Some(Ok(Chunk::ToolCalls(calls))) => {
                        let context = Message::assistant(std::mem::take(&mut self.buffer));
                        debug!(
                            tool_calls = calls.len(),
                            context_len = context.content.len(),
                            "Tool calls in stream, splicing continuation"
                        );
                        let mut inner = match self.handler.handle(calls, context).await {
                            Ok(inner) => inner,
                            Err(error) => return Some(Err(error)),
                        };
                        if inner.is_stream() {
                            self.phase = SplicePhase::Inner(inner);
                            continue;
                        }
                        trace!("Continuation is discrete, forwarding as one chunk");
                        let chunk = inner
                            .replace_content(Content::Empty)
                            .into_chunk()
                            .unwrap_or(Chunk::Empty);
                        metadata.merge(inner.metadata());
                        self.close(metadata);
                        return Some(Ok(chunk));
                    }
                    Some(Ok(chunk)) => {
                        if let Chunk::Text(text) = &chunk {
                            self.buffer.push_str(text);
                        }
                        self.phase = SplicePhase::Upstream;
                        return Some(Ok(chunk));
                    }
                },
            }
        }
    }
}
