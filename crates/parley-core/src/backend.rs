//! Generation backend abstraction
//!
//! The relay treats the language model as an opaque capability: given a
//! conversation, a system instruction and a sampling temperature it yields a
//! lazy, finite stream of text fragments. Setup faults (bad credentials,
//! unreachable host, non-success status) surface from [`GenerationBackend::stream_chat`]
//! itself; faults after the first byte arrive as `Err` items in the stream.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::message::Message;

/// Result type for backend operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Lazily produced text fragments
pub type FragmentStream = BoxStream<'static, LlmResult<String>>;

/// Backend errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Request could not be sent or the connection failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend answered with a non-success status
    #[error("{provider} API error ({status}): {body}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Backend answered with something we could not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend is misconfigured (missing API key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The fragment stream failed after it started
    #[error("Stream error: {0}")]
    Stream(String),
}

/// One generation request as forwarded by the relay
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Fixed system instruction placed ahead of the conversation
    pub system: String,
    /// Conversation, oldest first
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens, if any
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a request without a token limit
    pub fn new(system: impl Into<String>, messages: Vec<Message>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            messages,
            temperature,
            max_tokens: None,
        }
    }

    /// Limit the number of generated tokens
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Content of the most recent user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == crate::message::Role::User)
            .map(|m| m.content())
    }
}

/// A text-generation backend
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Open a streaming generation
    ///
    /// Returns once the backend has accepted the request; fragments then
    /// arrive in order on the returned stream.
    async fn stream_chat(&self, request: GenerationRequest) -> LlmResult<FragmentStream>;

    /// Cheap reachability probe
    async fn health_check(&self) -> LlmResult<bool>;

    /// Provider display name
    fn provider_name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;
}
