//! Infrastructure layer for loom
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading
//! and scenario replay.

pub mod config;
pub mod memory;
pub mod platform;
pub mod scenario;
pub mod structured;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigIssueCode, ConfigLoader, FileAgentConfig, FileConfig,
    FileOutputConfig, Severity,
};
pub use memory::StaticMemoryProvider;
pub use platform::{InMemoryPlatform, ScriptedTurn, StreamSource};
pub use scenario::{Scenario, ScenarioError};
pub use structured::SchemaRegistry;
pub use tools::{ScriptedTool, SubagentTool, Tool, ToolBox, ToolOutput};
