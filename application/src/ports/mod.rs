//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod memory;
pub mod platform;
pub mod processor;
pub mod response_format;
pub mod tool_registry;
