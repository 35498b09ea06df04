//! Google Gemini chat backend
//!
//! Streams from `models/{model}:streamGenerateContent?alt=sse`. The system
//! instruction travels separately from the conversation, and assistant turns
//! use Gemini's `model` role.

use async_trait::async_trait;
use parley_core::{
    FragmentStream, GenerationBackend, GenerationRequest, LlmError, LlmResult, Role,
};
use serde::Deserialize;
use std::time::Duration;

use super::stream::{line_fragments, send_checked, LineFormat, Parsed};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";

/// Gemini backend
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(api_key: String, base_url: Option<String>, model: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role() {
                        Role::User => "user",
                        Role::Assistant => "model",
                    },
                    "parts": [{ "text": m.content() }],
                })
            })
            .collect();

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system }] },
            "contents": contents,
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn stream_chat(&self, request: GenerationRequest) -> LlmResult<FragmentStream> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        );
        let body = self.request_body(&request);

        tracing::debug!(
            "Gemini streaming request: model={}, messages={}",
            self.model,
            request.messages.len()
        );

        let response = send_checked(
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .timeout(self.timeout),
            PROVIDER,
        )
        .await?;

        Ok(line_fragments(response, LineFormat::Sse, parse_chunk))
    }

    async fn health_check(&self) -> LlmResult<bool> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(response.status().is_success())
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn parse_chunk(payload: &str) -> LlmResult<Parsed> {
    let chunk: GeminiChunk = serde_json::from_str(payload)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse Gemini chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::Stream(error.message));
    }

    let text: String = chunk
        .candidates
        .iter()
        .take(1)
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    Ok(Parsed::Text(text))
}

#[derive(Debug, Deserialize)]
struct GeminiChunk {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    message: String,
}
