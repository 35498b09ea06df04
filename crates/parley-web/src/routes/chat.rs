//! Chat relay endpoint with SSE streaming

use crate::services::RelayState;
use crate::WebError;
use axum::{
    body::Bytes,
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::post,
    Router,
};
use futures::StreamExt;
use parley_core::wire::{CHAT_PATH, UI_STREAM_HEADER, UI_STREAM_VERSION};
use parley_core::ChatRequest;
use std::convert::Infallible;

pub fn chat_routes(state: RelayState) -> Router {
    Router::new()
        .route(CHAT_PATH, post(chat_handler))
        .with_state(state)
}

/// Relay a conversation and stream the reply
///
/// The body is decoded by hand so that malformed JSON and unknown roles fail
/// the same way a backend setup error does.
async fn chat_handler(
    State(relay): State<RelayState>,
    body: Bytes,
) -> Result<impl IntoResponse, WebError> {
    let frames = match open_frames(&relay, &body).await {
        Ok(frames) => frames,
        Err(e) => {
            tracing::error!("Chat request failed: {}", e);
            return Err(e);
        }
    };

    let events = frames.map(|event| {
        tracing::trace!("-> {}", event.kind());
        Ok::<_, Infallible>(Event::default().data(event.payload()))
    });

    Ok((
        [(UI_STREAM_HEADER, UI_STREAM_VERSION)],
        Sse::new(events).keep_alive(KeepAlive::new().interval(relay.keep_alive())),
    ))
}

async fn open_frames(
    relay: &RelayState,
    body: &[u8],
) -> crate::Result<futures::stream::BoxStream<'static, parley_core::StreamEvent>> {
    let request: ChatRequest = serde_json::from_slice(body)
        .map_err(|e| WebError::Generation(format!("invalid chat request: {e}")))?;

    tracing::info!("Chat request with {} messages", request.messages.len());
    relay.open(request.messages).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RelayService;
    use axum::http::{Request, StatusCode};
    use parley_config::Config;
    use parley_llm::MockBackend;
    use std::sync::Arc;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_setup_failure_is_logged() {
        let mock = MockBackend::new();
        mock.fail_setup(parley_core::LlmError::Http("connection refused".into()));
        let state = Arc::new(RelayService::new(Arc::new(mock), &Config::default()));

        let response = chat_routes(state)
            .oneshot(
                Request::post(CHAT_PATH)
                    .body(axum::body::Body::from(
                        r#"{"messages":[{"role":"user","content":"hi"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs_contain("Chat request failed"));
        assert!(logs_contain("connection refused"));
    }
}
