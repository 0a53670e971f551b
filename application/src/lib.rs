//! Application layer for loom
//!
//! This crate contains the agent, its processors, and port definitions.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestrationParams;
pub use ports::{
    memory::{Memory, MemoryProvider},
    platform::{Platform, PlatformError},
    processor::{
        AgentAware, AgentHandle, AgentSlot, Input, InputProcessor, ModelInvoker, Output,
        OutputProcessor,
    },
    response_format::ResponseFormatFactory,
    tool_registry::{ToolExecutionError, ToolExecutionFailure, ToolFailure, ToolRegistry},
};
pub use use_cases::agent::{Agent, AgentBuilder, DEFAULT_AGENT_NAME};
pub use use_cases::fault_tolerant::FaultTolerantRegistry;
pub use use_cases::memory::MemoryInputProcessor;
pub use use_cases::structured_output::StructuredOutputProcessor;
pub use use_cases::tool_loop::{
    ToolOrchestrator,
    splice::{SpliceEngine, ToolCallHandler},
};
