//! Per-call request options
//!
//! Options travel from the caller through the input processors to the
//! platform. Processors consume the options they understand (removing them
//! where the original request must not see them) and add derived ones.

use crate::tool::entities::ToolDefinition;
use serde_json::{Map, Value};

/// Options of a single agent call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Ask the platform for a lazily streamed result.
    pub stream: bool,
    /// Name of the structure the answer must conform to.
    pub output_structure: Option<String>,
    /// Provider response format derived from `output_structure`.
    pub response_format: Option<Value>,
    /// `Some(false)` disables memory injection for this call.
    pub use_memory: Option<bool>,
    /// Restrict the advertised tools to these names.
    pub tools: Option<Vec<String>>,
    /// Tool definitions published to the model.
    pub tool_definitions: Vec<ToolDefinition>,
    /// Free-form provider options (temperature, max_tokens, ...).
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streaming() -> Self {
        Self::default().with_stream(true)
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_output_structure(mut self, structure: impl Into<String>) -> Self {
        self.output_structure = Some(structure.into());
        self
    }

    pub fn with_use_memory(mut self, use_memory: bool) -> Self {
        self.use_memory = Some(use_memory);
        self
    }

    pub fn with_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = RequestOptions::new();
        assert!(!options.stream);
        assert!(options.output_structure.is_none());
        assert!(options.use_memory.is_none());
        assert!(options.tools.is_none());
        assert!(options.tool_definitions.is_empty());
    }

    #[test]
    fn test_builders() {
        let options = RequestOptions::streaming()
            .with_tools(["weather", "clock"])
            .with_use_memory(false)
            .with_option("temperature", 0.2);

        assert!(options.stream);
        assert_eq!(options.tools, Some(vec!["weather".to_string(), "clock".to_string()]));
        assert_eq!(options.use_memory, Some(false));
        assert_eq!(options.option("temperature"), Some(&json!(0.2)));
    }
}
