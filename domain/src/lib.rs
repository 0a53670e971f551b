//! Domain layer for loom
//!
//! This crate contains the entities and value objects the agent works with.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Results and chunks
//!
//! Every model invocation yields an [`AgentResult`]: discrete content (text,
//! a structured value, tool calls, nothing) or a lazy [`ChunkSource`]. The
//! result carries a [`Metadata`] container that survives splicing.
//!
//! ## Metadata merging
//!
//! Merging containers overwrites values, except for kinds registered in a
//! [`MergePolicy`]: token usage aggregates and source ledgers concatenate.
//!
//! ## Tools
//!
//! A [`ToolCall`] requested by the model turns into a [`ToolResult`] whose
//! payload is fed back to the model, together with the [`Source`]s the tool
//! consulted.

pub mod core;
pub mod metadata;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use core::error::{AgentError, DEFAULT_INVALID_REQUEST_MESSAGE};
pub use metadata::{
    MergeFn, MergePolicy, Metadata, MetadataValue, SOURCES_KEY, TOKEN_USAGE_KEY, ValueKind,
    token_usage::{TokenUsage, UsageRecord},
};
pub use session::{
    entities::{Conversation, Message, Role},
    options::RequestOptions,
    response::{AgentResult, Content, RawResult},
    stream::{Chunk, ChunkQueue, ChunkSource, ToolCallResult},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition},
    source::{Source, SourceLedger},
    value_objects::ToolResult,
};
