//! Conversation and result domain.
//!
//! - [`entities::Conversation`]: ordered messages sent to the model
//! - [`options::RequestOptions`]: per-call options, mutated by input processors
//! - [`response::AgentResult`]: content, metadata and raw handle of an invocation
//! - [`stream::ChunkSource`]: pull-based chunk producer behind streamed results

pub mod entities;
pub mod options;
pub mod response;
pub mod stream;
