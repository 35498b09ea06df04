//! Relay between the chat endpoint and the generation backend

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures::stream::{BoxStream, StreamExt};
use parley_config::Config;
use parley_core::prompts::SYSTEM_PROMPT;
use parley_core::{FragmentStream, GenerationBackend, GenerationRequest, Message, StreamEvent};
use uuid::Uuid;

use crate::{Result, WebError};

/// Shared state for relay routes
pub type RelayState = Arc<RelayService>;

/// Stateless per request: every call opens a fresh generation
pub struct RelayService {
    backend: Arc<dyn GenerationBackend>,
    system_prompt: String,
    temperature: f32,
    max_tokens: Option<u32>,
    keep_alive: Duration,
}

impl RelayService {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: &Config) -> Self {
        Self {
            backend,
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: config.chat.temperature,
            max_tokens: config.chat.max_tokens,
            keep_alive: Duration::from_secs(config.web.keep_alive_secs),
        }
    }

    /// Replace the system instruction sent ahead of every conversation
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn backend(&self) -> &dyn GenerationBackend {
        self.backend.as_ref()
    }

    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Start a generation for `messages` and frame its fragments
    ///
    /// Fails before any frame is produced when the conversation is empty or
    /// the backend refuses the request.
    pub async fn open(&self, messages: Vec<Message>) -> Result<BoxStream<'static, StreamEvent>> {
        if messages.is_empty() {
            return Err(WebError::Generation("conversation is empty".to_string()));
        }

        tracing::debug!(
            "Relaying {} messages to {} ({})",
            messages.len(),
            self.backend.provider_name(),
            self.backend.model()
        );

        let request = GenerationRequest::new(self.system_prompt.clone(), messages, self.temperature)
            .with_max_tokens(self.max_tokens);
        let fragments = self.backend.stream_chat(request).await?;

        Ok(ui_message_stream(fragments, Uuid::new_v4().to_string()))
    }
}

/// Wrap backend fragments in UI message stream framing
///
/// A successful reply ends with `finish` and the `[DONE]` sentinel. A
/// fragment error becomes an `error` frame and ends the stream without
/// `[DONE]`.
pub fn ui_message_stream(
    mut fragments: FragmentStream,
    message_id: String,
) -> BoxStream<'static, StreamEvent> {
    Box::pin(stream! {
        let text_id = format!("text-{message_id}");
        yield StreamEvent::Start { message_id: Some(message_id) };
        yield StreamEvent::StartStep;
        yield StreamEvent::TextStart { id: text_id.clone() };

        let mut count = 0usize;
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(delta) => {
                    count += 1;
                    yield StreamEvent::text_delta(text_id.clone(), delta);
                }
                Err(e) => {
                    tracing::warn!("Generation failed after {} fragments: {}", count, e);
                    yield StreamEvent::error(e.to_string());
                    return;
                }
            }
        }

        tracing::debug!("Generation finished after {} fragments", count);
        yield StreamEvent::TextEnd { id: text_id };
        yield StreamEvent::FinishStep;
        yield StreamEvent::Finish;
        yield StreamEvent::Done;
    })
}
