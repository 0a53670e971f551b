//! In-memory platform
//!
//! Serves scripted turns in order, one per invocation. Useful for tests and
//! for replaying a conversation without a provider.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use loom_application::{Platform, PlatformError};
use loom_domain::{
    AgentResult, Chunk, Conversation, Metadata, RawResult, RequestOptions, TOKEN_USAGE_KEY,
    TokenUsage, ToolCall,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use super::stream::StreamSource;

/// Token counts reported for a scripted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptedUsage {
    pub prompt: u64,
    pub completion: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptedErrorKind {
    Client,
    Server,
    Transport,
}

/// A provider failure to replay
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedError {
    pub kind: ScriptedErrorKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

impl From<ScriptedError> for PlatformError {
    fn from(error: ScriptedError) -> Self {
        match error.kind {
            ScriptedErrorKind::Client => PlatformError::Client {
                message: error.message,
                details: error.details,
            },
            ScriptedErrorKind::Server => PlatformError::Server(error.message),
            ScriptedErrorKind::Transport => PlatformError::Transport(error.message),
        }
    }
}

/// One model turn.
///
/// Streamed, the turn yields its text pieces as separate chunks, then the
/// structured value, then the tool calls. Buffered, tool calls take
/// precedence over structured content, which takes precedence over text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScriptedTurn {
    #[serde(deserialize_with = "one_or_many")]
    pub text: Vec<String>,
    pub tool_calls: Vec<ToolCall>,
    pub structured: Option<Value>,
    pub usage: Option<ScriptedUsage>,
    pub error: Option<ScriptedError>,
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(text) => vec![text],
        OneOrMany::Many(pieces) => pieces,
    })
}

impl ScriptedTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: vec![text.into()],
            ..Default::default()
        }
    }

    pub fn chunks<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: pieces.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Default::default()
        }
    }

    pub fn failing(error: ScriptedError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn with_usage(mut self, prompt: u64, completion: u64) -> Self {
        self.usage = Some(ScriptedUsage { prompt, completion });
        self
    }

    /// Render the turn as a platform response.
    pub fn into_result(self, stream: bool) -> Result<AgentResult, PlatformError> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        let metadata = match self.usage {
            Some(usage) => Metadata::new().with(
                TOKEN_USAGE_KEY,
                TokenUsage::new(usage.prompt, usage.completion),
            ),
            None => Metadata::new(),
        };

        let result = if stream {
            let mut chunks: Vec<Chunk> = self.text.into_iter().map(Chunk::Text).collect();
            chunks.extend(self.structured.map(Chunk::Structured));
            if !self.tool_calls.is_empty() {
                chunks.push(Chunk::tool_calls(self.tool_calls));
            }
            AgentResult::stream(StreamSource::from_chunks(chunks))
        } else if !self.tool_calls.is_empty() {
            AgentResult::tool_calls(self.tool_calls)
        } else if let Some(value) = self.structured {
            AgentResult::structured(value)
        } else if self.text.is_empty() {
            AgentResult::empty()
        } else {
            AgentResult::text(self.text.concat())
        };

        Ok(result.with_metadata(metadata))
    }
}

/// A recorded call to [`InMemoryPlatform::invoke`]
#[derive(Debug, Clone)]
pub struct Invocation {
    pub model: String,
    pub conversation: Conversation,
    pub options: RequestOptions,
}

/// Platform answering from a queue of [`ScriptedTurn`]s
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    turns: Mutex<VecDeque<ScriptedTurn>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl InMemoryPlatform {
    pub fn new(turns: impl IntoIterator<Item = ScriptedTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn push_turn(&self, turn: ScriptedTurn) {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(turn);
    }

    pub fn remaining(&self) -> usize {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Platform for InMemoryPlatform {
    async fn invoke(
        &self,
        model: &str,
        conversation: &Conversation,
        options: &RequestOptions,
    ) -> Result<AgentResult, PlatformError> {
        let turn_index = {
            let mut invocations = self
                .invocations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            invocations.push(Invocation {
                model: model.to_string(),
                conversation: conversation.clone(),
                options: options.clone(),
            });
            invocations.len()
        };

        let turn = self
            .turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let Some(turn) = turn else {
            tracing::warn!(model, turn = turn_index, "No scripted turn left");
            return Err(PlatformError::Server(format!(
                "no scripted turn left for invocation {turn_index}"
            )));
        };

        tracing::debug!(
            model,
            turn = turn_index,
            stream = options.stream,
            messages = conversation.len(),
            "Serving scripted turn"
        );

        let result = turn.into_result(options.stream)?;
        Ok(result.with_raw(RawResult::new(json!({
            "model": model,
            "turn": turn_index,
        }))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_domain::{Content, Message};

    fn conversation() -> Conversation {
        Conversation::new().with_message(Message::user("Hi"))
    }

    // ==================== Buffered ====================

    #[tokio::test]
    async fn test_serves_turns_in_order() {
        let platform = InMemoryPlatform::new(vec![
            ScriptedTurn::text("first"),
            ScriptedTurn::text("second"),
        ]);
        let options = RequestOptions::default();

        let first = platform.invoke("m", &conversation(), &options).await.unwrap();
        let second = platform.invoke("m", &conversation(), &options).await.unwrap();

        assert_eq!(first.as_text(), Some("first"));
        assert_eq!(second.as_text(), Some("second"));
        assert_eq!(platform.invocation_count(), 2);
        assert_eq!(platform.remaining(), 0);
    }

    #[tokio::test]
    async fn test_tool_calls_take_precedence_when_buffered() {
        let platform = InMemoryPlatform::new(vec![
            ScriptedTurn::text("ignored").with_tool_call(ToolCall::new("c1", "weather")),
        ]);

        let result = platform
            .invoke("m", &conversation(), &RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(result.requested_tool_calls().unwrap()[0].name, "weather");
    }

    #[tokio::test]
    async fn test_usage_and_raw_handle() {
        let platform = InMemoryPlatform::new(vec![ScriptedTurn::text("ok").with_usage(10, 5)]);

        let result = platform
            .invoke("gpt-test", &conversation(), &RequestOptions::default())
            .await
            .unwrap();

        let usage = result.metadata().token_usage().unwrap();
        assert_eq!(usage.total_tokens(), 15);
        assert_eq!(
            result.raw().unwrap().payload(),
            &json!({"model": "gpt-test", "turn": 1})
        );
    }

    #[tokio::test]
    async fn test_empty_turn() {
        let platform = InMemoryPlatform::new(vec![ScriptedTurn::default()]);

        let result = platform
            .invoke("m", &conversation(), &RequestOptions::default())
            .await
            .unwrap();

        assert!(matches!(result.content(), Content::Empty));
    }

    // ==================== Streaming ====================

    #[tokio::test]
    async fn test_streamed_turn_yields_pieces_then_tool_calls() {
        let platform = InMemoryPlatform::new(vec![
            ScriptedTurn::chunks(["Let me ", "check."]).with_tool_call(ToolCall::new("c1", "weather")),
        ]);

        let mut result = platform
            .invoke("m", &conversation(), &RequestOptions::streaming())
            .await
            .unwrap();
        assert!(result.is_stream());

        let chunks = result.collect_chunks().await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], Chunk::text("Let me "));
        assert_eq!(chunks[1], Chunk::text("check."));
        assert!(chunks[2].is_tool_calls());
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_scripted_client_error() {
        let platform = InMemoryPlatform::new(vec![ScriptedTurn::failing(ScriptedError {
            kind: ScriptedErrorKind::Client,
            message: "bad schema".to_string(),
            details: Some(json!({"param": "tools"})),
        })]);

        let error = platform
            .invoke("m", &conversation(), &RequestOptions::default())
            .await
            .unwrap_err();

        assert!(error.is_client_error());
        assert_eq!(error.to_string(), "bad schema");
    }

    #[tokio::test]
    async fn test_exhausted_script_is_server_error() {
        let platform = InMemoryPlatform::new(Vec::new());

        let error = platform
            .invoke("m", &conversation(), &RequestOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(error, PlatformError::Server(_)));
        assert_eq!(platform.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_records_conversation_and_options() {
        let platform = InMemoryPlatform::new(vec![ScriptedTurn::text("ok")]);
        platform.push_turn(ScriptedTurn::text("later"));

        platform
            .invoke("model-a", &conversation(), &RequestOptions::streaming())
            .await
            .unwrap();

        let invocation = &platform.invocations()[0];
        assert_eq!(invocation.model, "model-a");
        assert_eq!(invocation.conversation.len(), 1);
        assert!(invocation.options.stream);
        assert_eq!(platform.remaining(), 1);
    }

    #[test]
    fn test_deserialize_turn_text_forms() {
        let single: ScriptedTurn = toml::from_str(r#"text = "hello""#).unwrap();
        let pieces: ScriptedTurn = toml::from_str(r#"text = ["a", "b"]"#).unwrap();
        let calls: ScriptedTurn = toml::from_str(
            r#"
            usage = { prompt = 3, completion = 4 }
            [[tool_calls]]
            id = "c1"
            name = "weather"
            arguments = { city = "Berlin" }
            "#,
        )
        .unwrap();

        assert_eq!(single.text, vec!["hello"]);
        assert_eq!(pieces.text, vec!["a", "b"]);
        assert_eq!(calls.tool_calls[0].get_string("city"), Some("Berlin"));
        assert_eq!(calls.usage, Some(ScriptedUsage { prompt: 3, completion: 4 }));
    }
}
