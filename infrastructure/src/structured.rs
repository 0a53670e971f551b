//! Schema registry for structured output
//!
//! Maps output structure names to JSON schemas and renders them as an
//! OpenAI-style `json_schema` response format.

use std::collections::BTreeMap;

use loom_application::ResponseFormatFactory;
use loom_domain::AgentError;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        let name = name.into();
        tracing::debug!(structure = %name, "Registered output schema");
        self.schemas.insert(name, schema);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}

impl ResponseFormatFactory for SchemaRegistry {
    fn create(&self, structure: &str) -> Result<Value, AgentError> {
        let schema = self.schemas.get(structure).ok_or_else(|| {
            AgentError::invalid_request(format!(
                "Unknown output structure \"{structure}\"."
            ))
        })?;

        Ok(json!({
            "type": "json_schema",
            "json_schema": {
                "name": structure,
                "schema": schema,
                "strict": true,
            }
        }))
    }
}
