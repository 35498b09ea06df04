//! Ollama chat backend

use async_trait::async_trait;
use parley_core::{FragmentStream, GenerationBackend, GenerationRequest, LlmError, LlmResult};
use serde::Deserialize;
use std::time::Duration;

use super::stream::{line_fragments, send_checked, LineFormat, Parsed};

const PROVIDER: &str = "Ollama";

/// Ollama backend
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: String, model: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
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

        let mut options = serde_json::json!({ "temperature": request.temperature });
        if let Some(max_tokens) = request.max_tokens {
            options["num_predict"] = serde_json::json!(max_tokens);
        }

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": true,
            "options": options,
        })
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn stream_chat(&self, request: GenerationRequest) -> LlmResult<FragmentStream> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.request_body(&request);

        tracing::debug!(
            "Ollama streaming request: model={}, messages={}",
            self.model,
            request.messages.len()
        );

        let response = send_checked(
            self.client.post(&url).json(&body).timeout(self.timeout),
            PROVIDER,
        )
        .await?;

        Ok(line_fragments(response, LineFormat::Ndjson, parse_line))
    }

    async fn health_check(&self) -> LlmResult<bool> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
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

fn parse_line(line: &str) -> LlmResult<Parsed> {
    let chunk: OllamaStreamResponse = serde_json::from_str(line)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse stream: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::Stream(error));
    }

    let text = chunk.message.map(|m| m.content).unwrap_or_default();
    if chunk.done {
        // The final line may still carry text
        return Ok(if text.is_empty() { Parsed::End } else { Parsed::Text(text) });
    }
    Ok(Parsed::Text(text))
}

#[derive(Debug, Deserialize)]
struct OllamaStreamResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}
