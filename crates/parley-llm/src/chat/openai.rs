//! OpenAI-compatible chat backend

use async_trait::async_trait;
use parley_core::{FragmentStream, GenerationBackend, GenerationRequest, LlmError, LlmResult};
use serde::Deserialize;
use std::time::Duration;

use super::stream::{line_fragments, send_checked, until_done, LineFormat, Parsed};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const PROVIDER: &str = "OpenAI";

/// OpenAI (or compatible) backend
pub struct OpenAIBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend
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
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system,
        })];
        messages.extend(request.messages.iter().map(|m| {
            serde_json::json!({
                "role": m.role().as_str(),
                "content": m.content(),
            })
        }));

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "stream": true,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn stream_chat(&self, request: GenerationRequest) -> LlmResult<FragmentStream> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);

        tracing::debug!(
            "OpenAI streaming request: model={}, messages={}",
            self.model,
            request.messages.len()
        );

        let response = send_checked(
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .timeout(self.timeout),
            PROVIDER,
        )
        .await?;

        Ok(line_fragments(response, LineFormat::Sse, until_done(parse_chunk)))
    }

    async fn health_check(&self) -> LlmResult<bool> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
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
    let chunk: OpenAIChunk = serde_json::from_str(payload)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse OpenAI chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::Stream(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .map(Parsed::Text)
        .unwrap_or(Parsed::Skip))
}

#[derive(Debug, Deserialize)]
struct OpenAIChunk {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    error: Option<OpenAIError>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    #[serde(default)]
    delta: OpenAIDelta,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    #[serde(default)]
    message: String,
}
