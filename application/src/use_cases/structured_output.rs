//! Structured output processor
//!
//! On input, a requested `output_structure` is turned into a provider
//! `response_format` through a [`ResponseFormatFactory`]. On output, the
//! text answer of such a request is decoded as JSON into a structured
//! result. Streaming is not supported for structured output.

use crate::ports::processor::{Input, InputProcessor, Output, OutputProcessor};
use crate::ports::response_format::ResponseFormatFactory;
use async_trait::async_trait;
use loom_domain::{AgentError, Content};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const STREAMING_NOT_SUPPORTED: &str = "Streamed responses are not supported for structured output.";

pub struct StructuredOutputProcessor {
    factory: Arc<dyn ResponseFormatFactory>,
}

impl StructuredOutputProcessor {
    pub fn new(factory: Arc<dyn ResponseFormatFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl InputProcessor for StructuredOutputProcessor {
    async fn process_input(&self, input: &mut Input) -> Result<(), AgentError> {
        let Some(structure) = input.options().output_structure.clone() else {
            return Ok(());
        };
        if input.options().stream {
            return Err(AgentError::invalid_request(STREAMING_NOT_SUPPORTED));
        }

        let format = self.factory.create(&structure)?;
        debug!(structure = %structure, "Requesting structured output");
        let options = input.options_mut();
        options.response_format = Some(format);
        options.output_structure = None;
        Ok(())
    }
}

#[async_trait]
impl OutputProcessor for StructuredOutputProcessor {
    async fn process_output(&self, output: &mut Output) -> Result<(), AgentError> {
        if output.options().response_format.is_none() {
            return Ok(());
        }
        let result = output.result_mut();
        let Some(text) = result.as_text() else {
            return Ok(());
        };
        let value: Value = serde_json::from_str(text).map_err(|e| {
            AgentError::invalid_request(format!("Structured output is not valid JSON: {e}"))
        })?;
        result.replace_content(Content::Structured(value));
        Ok(())
    }
}
