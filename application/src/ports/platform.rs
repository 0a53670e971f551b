//! Platform port
//!
//! Defines the interface for invoking a model on a provider platform.

use async_trait::async_trait;
use loom_domain::{AgentResult, Conversation, RequestOptions};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The provider rejected the request (4xx class).
    #[error("{message}")]
    Client {
        message: String,
        /// Structured error body returned by the provider, if any.
        details: Option<Value>,
    },

    /// The provider failed to serve the request (5xx class).
    #[error("Server error: {0}")]
    Server(String),

    /// The request never reached the provider, or the response was lost.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl PlatformError {
    pub fn client(message: impl Into<String>) -> Self {
        PlatformError::Client {
            message: message.into(),
            details: None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, PlatformError::Client { .. })
    }
}

/// Model invocation on a provider platform
///
/// Content of the returned result is lazy when `options.stream` is set and
/// the platform supports streaming, discrete otherwise. Implementations
/// (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn invoke(
        &self,
        model: &str,
        conversation: &Conversation,
        options: &RequestOptions,
    ) -> Result<AgentResult, PlatformError>;
}
