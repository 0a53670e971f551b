//! Platform adapters
//!
//! - [`in_memory::InMemoryPlatform`]: scripted turns, for tests and dry runs
//! - [`stream::StreamSource`]: adapts any `futures::Stream` of chunks into a
//!   [`ChunkSource`](loom_domain::ChunkSource)

pub mod in_memory;
pub mod stream;

pub use in_memory::{
    InMemoryPlatform, Invocation, ScriptedError, ScriptedErrorKind, ScriptedTurn, ScriptedUsage,
};
pub use stream::StreamSource;
