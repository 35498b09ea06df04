//! # Parley LLM
//!
//! Generation backends the relay forwards conversations to.
//!
//! ## Providers
//!
//! - [`GeminiBackend`]: Google Gemini `streamGenerateContent` (SSE)
//! - [`OpenAIBackend`]: OpenAI-compatible `/chat/completions` (SSE, `[DONE]`)
//! - [`OllamaBackend`]: Ollama `/api/chat` (NDJSON)
//! - [`MockBackend`]: scripted fragments, failures and delays
//!
//! All of them implement [`parley_core::GenerationBackend`]: connection and
//! status errors are returned from `stream_chat` before any fragment is
//! produced, later faults arrive as `Err` items on the fragment stream.
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use parley_config::ChatConfig;
//! use parley_core::{prompts::SYSTEM_PROMPT, GenerationRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = parley_llm::create_backend(&ChatConfig::default())?;
//!     let request = GenerationRequest::new(SYSTEM_PROMPT, vec![Message::user("Hi!")], 0.7);
//!
//!     let mut fragments = backend.stream_chat(request).await?;
//!     while let Some(fragment) = fragments.next().await {
//!         print!("{}", fragment?);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod mock;

pub use chat::{create_backend, GeminiBackend, OllamaBackend, OpenAIBackend};
pub use mock::{MockBackend, MockStep};
