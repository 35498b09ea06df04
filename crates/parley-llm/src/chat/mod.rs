//! Streaming chat backends

pub mod gemini;
pub mod ollama;
pub mod openai;
mod stream;

pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAIBackend;

use std::sync::Arc;

use parley_config::{ChatConfig, LlmProviderType};
use parley_core::{GenerationBackend, LlmError, LlmResult};

use crate::mock::MockBackend;

/// Create a generation backend from configuration
///
/// API keys come from the provider's environment variable
/// (`GOOGLE_GENERATIVE_AI_API_KEY`, `OPENAI_API_KEY`).
pub fn create_backend(config: &ChatConfig) -> LlmResult<Arc<dyn GenerationBackend>> {
    let backend: Arc<dyn GenerationBackend> = match config.provider {
        LlmProviderType::Gemini => Arc::new(GeminiBackend::new(
            api_key(config.provider)?,
            Some(config.llm_endpoint()),
            config.chat_model(),
            config.timeout_secs,
        )),
        LlmProviderType::OpenAI => Arc::new(OpenAIBackend::new(
            api_key(config.provider)?,
            Some(config.llm_endpoint()),
            config.chat_model(),
            config.timeout_secs,
        )),
        LlmProviderType::Ollama => Arc::new(OllamaBackend::new(
            config.llm_endpoint(),
            config.chat_model(),
            config.timeout_secs,
        )),
        LlmProviderType::Mock => Arc::new(MockBackend::with_model(config.chat_model())),
    };

    tracing::info!(
        "Using {} backend with model {}",
        backend.provider_name(),
        backend.model()
    );
    Ok(backend)
}

fn api_key(provider: LlmProviderType) -> LlmResult<String> {
    let Some(var) = provider.api_key_env() else {
        return Ok(String::new());
    };
    std::env::var(var).map_err(|_| LlmError::Config(format!("{var} not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_backend() {
        let config = ChatConfig {
            provider: LlmProviderType::Mock,
            model: Some("scripted".into()),
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.provider_name(), "Mock");
        assert_eq!(backend.model(), "scripted");
    }

    #[test]
    fn test_create_ollama_needs_no_key() {
        let config = ChatConfig {
            provider: LlmProviderType::Ollama,
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.provider_name(), "Ollama");
    }
}
