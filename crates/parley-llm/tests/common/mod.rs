//! Shared helpers for backend streaming tests

#![allow(dead_code)]

pub mod mock_server;

use futures::StreamExt;
use parley_core::{FragmentStream, GenerationRequest, LlmError, Message};

pub fn create_test_request(content: &str) -> GenerationRequest {
    GenerationRequest::new("You are a test assistant.", vec![Message::user(content)], 0.7)
        .with_max_tokens(Some(100))
}

/// Concatenate every fragment, failing on the first error
pub async fn collect_stream_content(mut stream: FragmentStream) -> Result<String, LlmError> {
    let mut content = String::new();
    while let Some(fragment) = stream.next().await {
        content.push_str(&fragment?);
    }
    Ok(content)
}

/// Concatenate fragments up to the first error, returning both
pub async fn collect_stream_with_error(mut stream: FragmentStream) -> (String, Option<LlmError>) {
    let mut content = String::new();
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => content.push_str(&text),
            Err(e) => return (content, Some(e)),
        }
    }
    (content, None)
}
