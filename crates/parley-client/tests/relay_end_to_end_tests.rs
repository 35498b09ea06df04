//! Sessions talking HTTP to a live relay and to wiremock stand-ins

use std::sync::Arc;
use std::time::Duration;

use parley_client::{ChatSession, HttpRelay, Phase, RelayTransport, SessionOptions, TurnOutcome};
use parley_config::Config;
use parley_core::{ChatError, LlmError, Message, Role, StreamEvent};
use parley_llm::{MockBackend, MockStep};
use parley_web::{build_router, serve, RelayService};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct LiveRelay {
    url: String,
    shutdown: CancellationToken,
}

impl Drop for LiveRelay {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn start_relay(mock: &MockBackend) -> LiveRelay {
    let config = Config::default();
    let state = Arc::new(RelayService::new(Arc::new(mock.clone()), &config));
    let app = build_router(state, &config.web).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/chat", listener.local_addr().unwrap());
    let shutdown = CancellationToken::new();
    tokio::spawn(serve(listener, app, shutdown.clone()));

    LiveRelay { url, shutdown }
}

fn session_for(url: &str) -> ChatSession {
    ChatSession::new(HttpRelay::new(url), SessionOptions::default())
}

#[tokio::test]
async fn test_reply_streams_through_relay() {
    let mock = MockBackend::with_fragments(["The masterclass ", "covers ", "visas."]);
    let relay = start_relay(&mock).await;
    let session = session_for(&relay.url);

    let outcome = session.submit("What is covered?").await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            reply: Some("The masterclass covers visas.".into())
        }
    );
    let snap = session.snapshot();
    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.transcript.len(), 2);
    assert_eq!(snap.last_error, None);
}

#[tokio::test]
async fn test_second_turn_sends_history() {
    let mock = MockBackend::with_fragments(["ok"]);
    let relay = start_relay(&mock).await;
    let session = session_for(&relay.url);

    session.submit("first").await.unwrap();
    session.submit("second").await.unwrap();

    let calls = mock.call_history();
    assert_eq!(calls.len(), 2);
    let roles: Vec<Role> = calls[1].messages.iter().map(Message::role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
}

#[tokio::test]
async fn test_backend_setup_failure_reaches_session() {
    let mock = MockBackend::new();
    mock.fail_setup(LlmError::Config("GOOGLE_GENERATIVE_AI_API_KEY not set".into()));
    let relay = start_relay(&mock).await;
    let session = session_for(&relay.url);

    let outcome = session.submit("Hi").await.unwrap();

    match outcome {
        TurnOutcome::Failed(ChatError::RelaySetupFailure(message)) => {
            assert!(message.contains("GOOGLE_GENERATIVE_AI_API_KEY"));
        }
        other => panic!("expected setup failure, got {other:?}"),
    }
    assert_eq!(session.snapshot().transcript.len(), 1);
}

#[tokio::test]
async fn test_backend_failure_mid_stream() {
    let mock = MockBackend::new();
    mock.set_default_script([
        MockStep::fragment("Par"),
        MockStep::Delay(Duration::from_millis(10)),
        MockStep::fragment("tial"),
        MockStep::Fail("upstream closed".into()),
    ]);
    let relay = start_relay(&mock).await;
    let session = session_for(&relay.url);

    let outcome = session.submit("Hi").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed { reply: Some("Partial".into()) });
    assert!(matches!(
        session.snapshot().last_error,
        Some(ChatError::StreamTransportFailure(ref text)) if text.contains("upstream closed")
    ));
}

#[tokio::test]
async fn test_http_relay_decodes_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Gemini API error (429): quota"
        })))
        .mount(&server)
        .await;

    let relay = HttpRelay::new(format!("{}/api/chat", server.uri()));
    let result = relay.open(&[Message::user("Hi")]).await;

    assert_eq!(
        result.err(),
        Some(ChatError::RelaySetupFailure("Gemini API error (429): quota".into()))
    );
}

#[tokio::test]
async fn test_http_relay_non_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let relay = HttpRelay::new(format!("{}/api/chat", server.uri()));
    let err = relay.open(&[Message::user("Hi")]).await.err().unwrap();

    assert!(matches!(err, ChatError::RelaySetupFailure(ref m) if m.contains("502") && m.contains("Bad Gateway")));
}

#[tokio::test]
async fn test_relay_without_done_still_completes() {
    let mut body = StreamEvent::text_delta("t", "no ").to_sse();
    // Final line has no trailing newline
    body.push_str(&format!("data: {}", StreamEvent::text_delta("t", "sentinel").payload()));
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let session = session_for(&format!("{}/api/chat", server.uri()));
    let outcome = session.submit("Hi").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed { reply: Some("no sentinel".into()) });
}

#[tokio::test]
async fn test_unreachable_relay() {
    let session = session_for("http://127.0.0.1:1/api/chat");

    let outcome = session.submit("Hi").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Failed(ChatError::RelaySetupFailure(_))));
    assert_eq!(session.phase(), Phase::Idle);
}
