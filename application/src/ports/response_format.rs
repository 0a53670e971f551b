//! Response format port
//!
//! Structured output needs a provider response format for a named output
//! structure. How the schema behind a structure is produced is up to the
//! adapter.

use loom_domain::AgentError;
use serde_json::Value;

/// Derives a provider `response_format` for a named output structure.
pub trait ResponseFormatFactory: Send + Sync {
    fn create(&self, structure: &str) -> Result<Value, AgentError>;
}
