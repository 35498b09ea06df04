//! Generation backend configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::defaults;
use crate::{ConfigError, ConfigResult};

/// Supported generation providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Google Gemini (`streamGenerateContent`)
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible `/chat/completions` endpoint
    OpenAI,
    /// Local Ollama server
    Ollama,
    /// Scripted in-process backend for demos and tests
    Mock,
}

impl LlmProviderType {
    /// Lowercase provider name as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProviderType::Gemini => "gemini",
            LlmProviderType::OpenAI => "openai",
            LlmProviderType::Ollama => "ollama",
            LlmProviderType::Mock => "mock",
        }
    }

    /// Environment variable holding the API key, for providers that need one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LlmProviderType::Gemini => Some("GOOGLE_GENERATIVE_AI_API_KEY"),
            LlmProviderType::OpenAI => Some("OPENAI_API_KEY"),
            LlmProviderType::Ollama | LlmProviderType::Mock => None,
        }
    }
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProviderType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProviderType::Gemini),
            "openai" => Ok(LlmProviderType::OpenAI),
            "ollama" => Ok(LlmProviderType::Ollama),
            "mock" => Ok(LlmProviderType::Mock),
            other => Err(ConfigError::invalid(
                "chat.provider",
                format!("unknown provider '{other}' (expected gemini, openai, ollama or mock)"),
            )),
        }
    }
}

/// Backend settings the relay forwards with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// LLM provider to use
    pub provider: LlmProviderType,
    /// Model name (provider default when unset)
    pub model: Option<String>,
    /// Endpoint URL (provider default when unset)
    pub endpoint: Option<String>,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Backend request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            model: None,
            endpoint: None,
            temperature: defaults::DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ChatConfig {
    /// Get the LLM endpoint, using provider-specific default if not specified
    pub fn llm_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| match self.provider {
                LlmProviderType::Gemini => {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }
                LlmProviderType::OpenAI => "https://api.openai.com/v1".to_string(),
                LlmProviderType::Ollama => "http://localhost:11434".to_string(),
                LlmProviderType::Mock => "mock://local".to_string(),
            })
    }

    /// Get the chat model, using provider default if not specified
    pub fn chat_model(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            match self.provider {
                LlmProviderType::Gemini => defaults::DEFAULT_GEMINI_MODEL,
                LlmProviderType::OpenAI => defaults::DEFAULT_OPENAI_MODEL,
                LlmProviderType::Ollama => defaults::DEFAULT_OLLAMA_MODEL,
                LlmProviderType::Mock => "mock-llm",
            }
            .to_string()
        })
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "chat.temperature",
                format!("{} is outside 0.0-2.0", self.temperature),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("chat.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}
