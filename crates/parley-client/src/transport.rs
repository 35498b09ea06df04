//! Connection to the relay endpoint

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use parley_config::ClientConfig;
use parley_core::{ChatError, ChatRequest, ChatResult, ErrorBody, Message};

/// Raw response body, pulled chunk by chunk
pub type ByteStream = BoxStream<'static, ChatResult<Bytes>>;

/// Opens one streaming exchange per turn
///
/// Dropping the returned stream abandons the response.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send the conversation and return the reply body once the relay accepts it
    ///
    /// A relay that answers with a non-success status fails with
    /// [`ChatError::RelaySetupFailure`]; errors while reading the body arrive
    /// in the stream as [`ChatError::StreamTransportFailure`].
    async fn open(&self, messages: &[Message]) -> ChatResult<ByteStream>;
}

/// [`RelayTransport`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
}

impl HttpRelay {
    /// Talk to the relay at `url` (the full `/api/chat` URL)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Use the configured relay URL
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.relay_url.clone())
    }

    /// Relay URL requests are sent to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn open(&self, messages: &[Message]) -> ChatResult<ByteStream> {
        let body = ChatRequest::new(messages.iter().cloned());

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::RelaySetupFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.error,
                Err(_) if text.is_empty() => format!("relay returned {status}"),
                Err(_) => format!("relay returned {status}: {text}"),
            };
            return Err(ChatError::RelaySetupFailure(message));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ChatError::StreamTransportFailure(e.to_string())))
            .boxed())
    }
}
