//! Use cases (application services)
//!
//! - [`agent`]: the agent pipeline: input processors, model, output processors
//! - [`tool_loop`]: tool call resolution, buffered loop and stream splicing
//! - [`fault_tolerant`]: turns recoverable tool failures into tool results
//! - [`structured_output`]: response format derivation and JSON decoding
//! - [`memory`]: memory injection into the system prompt

pub mod agent;
pub mod fault_tolerant;
pub mod memory;
pub mod structured_output;
pub mod tool_loop;

mod tool_helpers;

#[cfg(test)]
mod testing;
