//! Tool domain
//!
//! - [`entities::ToolCall`]: a tool invocation requested by the model
//! - [`entities::ToolDefinition`]: what a registry advertises to the model
//! - [`value_objects::ToolResult`]: the outcome fed back into the conversation
//! - [`source::SourceLedger`]: provenance records collected from tools

pub mod entities;
pub mod source;
pub mod value_objects;
