//! Wiremock servers imitating each provider's streaming endpoint

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GEMINI_MODEL: &str = "gemini-test";

pub fn sse_body(payloads: &[String]) -> String {
    payloads.iter().map(|p| format!("data: {p}\n\n")).collect()
}

pub fn gemini_chunks(texts: &[&str]) -> String {
    let payloads: Vec<String> = texts
        .iter()
        .map(|t| {
            serde_json::json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": t }] } }]
            })
            .to_string()
        })
        .collect();
    sse_body(&payloads)
}

pub fn openai_chunks(texts: &[&str]) -> String {
    let mut payloads = vec![serde_json::json!({
        "choices": [{ "index": 0, "delta": { "role": "assistant" } }]
    })
    .to_string()];
    payloads.extend(texts.iter().map(|t| {
        serde_json::json!({
            "choices": [{ "index": 0, "delta": { "content": t }, "finish_reason": null }]
        })
        .to_string()
    }));
    let mut body = sse_body(&payloads);
    body.push_str("data: [DONE]\n\n");
    body
}

pub fn ollama_chunks(texts: &[&str]) -> String {
    let mut body: String = texts
        .iter()
        .map(|t| {
            format!(
                "{}\n",
                serde_json::json!({
                    "model": "llama3.2",
                    "message": { "role": "assistant", "content": t },
                    "done": false
                })
            )
        })
        .collect();
    body.push_str(
        &serde_json::json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": "" },
            "done": true,
            "done_reason": "stop"
        })
        .to_string(),
    );
    body.push('\n');
    body
}

pub async fn gemini_mock_server(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{GEMINI_MODEL}:streamGenerateContent")))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

pub async fn openai_mock_server(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

pub async fn ollama_mock_server(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/x-ndjson")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

/// Any POST answered with `status` and `body`
pub async fn error_mock_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}
