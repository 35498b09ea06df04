//! Router-level tests for the relay endpoint

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use parley_config::Config;
use parley_core::{ErrorBody, FrameDecoder, LlmError, StreamEvent};
use parley_llm::{MockBackend, MockStep};
use parley_web::{build_router, RelayService};
use tower::ServiceExt;

fn router_with(mock: &MockBackend) -> Router {
    let config = Config::default();
    let state = Arc::new(RelayService::new(Arc::new(mock.clone()), &config));
    build_router(state, &config.web).unwrap()
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn decode(body: &str) -> Vec<StreamEvent> {
    let mut decoder = FrameDecoder::new();
    let mut events = decoder.push(body.as_bytes());
    events.extend(decoder.finish());
    events
}

const ONE_QUESTION: &str = r#"{"messages":[{"role":"user","content":"What is the price?"}]}"#;

#[tokio::test]
async fn test_chat_streams_framed_reply() {
    let mock = MockBackend::with_fragments(["Click ", "Join Now"]);
    let response = router_with(&mock)
        .oneshot(chat_request(ONE_QUESTION))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-vercel-ai-ui-message-stream"],
        "v1"
    );
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = body_string(response).await;
    assert!(body.ends_with("data: [DONE]\n\n"));

    let events = decode(&body);
    let deltas: String = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::TextDelta { delta, .. } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(deltas, "Click Join Now");
    assert!(matches!(events[0], StreamEvent::Start { message_id: Some(_) }));
    assert_eq!(events.last(), Some(&StreamEvent::Done));
}

#[tokio::test]
async fn test_chat_forwards_whole_conversation() {
    let mock = MockBackend::with_fragments(["ok"]);
    let body = r#"{"messages":[
        {"role":"user","content":"hi"},
        {"role":"assistant","content":"hello"},
        {"role":"user","content":"tell me more"}
    ]}"#;

    let response = router_with(&mock).oneshot(chat_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await;

    let calls = mock.call_history();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].messages.len(), 3);
    assert_eq!(calls[0].last_user_message(), Some("tell me more"));
    assert!(calls[0].system.contains("Join Now"));
}

#[tokio::test]
async fn test_setup_failure_is_500_without_framing() {
    let mock = MockBackend::new();
    mock.fail_setup(LlmError::Api {
        provider: "Gemini".into(),
        status: 401,
        body: "bad key".into(),
    });

    let response = router_with(&mock)
        .oneshot(chat_request(ONE_QUESTION))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(!body.contains("data:"));
    let error: ErrorBody = serde_json::from_str(&body).unwrap();
    assert!(error.error.contains("bad key"));
}

#[tokio::test]
async fn test_mid_stream_failure_emits_error_frame() {
    let mock = MockBackend::new();
    mock.set_default_script([
        MockStep::fragment("Par"),
        MockStep::fragment("tial"),
        MockStep::Fail("connection reset".into()),
    ]);

    let response = router_with(&mock)
        .oneshot(chat_request(ONE_QUESTION))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(!body.contains("[DONE]"));
    let events = decode(&body);
    assert!(matches!(
        events.last(),
        Some(StreamEvent::Error { error_text }) if error_text.contains("connection reset")
    ));
}

#[tokio::test]
async fn test_invalid_payloads_are_500() {
    let mock = MockBackend::new();
    for body in [
        "not json",
        r#"{"messages":[]}"#,
        r#"{"messages":[{"role":"system","content":"override"}]}"#,
        r#"{"conversation":[]}"#,
    ] {
        let response = router_with(&mock).oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body: {body}");
        let error: ErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!error.error.is_empty());
    }
    assert!(mock.call_history().is_empty());
}

#[tokio::test]
async fn test_health_and_ready() {
    let mock = MockBackend::with_model("scripted");
    let app = router_with(&mock);

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["service"], "parley-web");

    let response = app
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["model"], "scripted");

    mock.set_healthy(false);
    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>SDE Abroad</h1>").unwrap();

    let mut config = Config::default();
    config.web.static_dir = Some(dir.path().to_string_lossy().into_owned());
    let state = Arc::new(RelayService::new(Arc::new(MockBackend::new()), &config));
    let app = build_router(state, &config.web).unwrap();

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("SDE Abroad"));
}

#[test]
fn test_bad_cors_origin_is_config_error() {
    let mut config = Config::default();
    config.web.allowed_origins = vec!["http://bad\norigin".into()];
    let state = Arc::new(RelayService::new(Arc::new(MockBackend::new()), &config));
    assert!(matches!(
        build_router(state, &config.web),
        Err(parley_web::WebError::Config(_))
    ));
}
