//! `futures::Stream` adapter for chunk sources

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use loom_domain::{AgentError, Chunk, ChunkSource, Metadata};

/// Chunk source pulling from a `futures` stream.
///
/// Provider SDKs usually hand out streams; wrapping one here lets it back a
/// streamed [`AgentResult`](loom_domain::AgentResult).
pub struct StreamSource<S> {
    stream: S,
}

impl<S> StreamSource<S>
where
    S: Stream<Item = Result<Chunk, AgentError>> + Send + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl StreamSource<BoxStream<'static, Result<Chunk, AgentError>>> {
    /// Box a stream that is not `Unpin`.
    pub fn boxed(stream: impl Stream<Item = Result<Chunk, AgentError>> + Send + 'static) -> Self {
        Self {
            stream: stream.boxed(),
        }
    }

    /// A stream over already known chunks.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self::boxed(futures::stream::iter(chunks.into_iter().map(Ok::<Chunk, AgentError>)))
    }
}

#[async_trait]
impl<S> ChunkSource for StreamSource<S>
where
    S: Stream<Item = Result<Chunk, AgentError>> + Send + Unpin,
{
    async fn next_chunk(
        &mut self,
        _metadata: &mut Metadata,
    ) -> Option<Result<Chunk, AgentError>> {
        self.stream.next().await
    }
}
