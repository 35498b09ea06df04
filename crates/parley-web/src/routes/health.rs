//! Health check endpoints

use crate::services::RelayState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

pub fn health_routes(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "parley-web"
    }))
}

/// Ready once the generation backend answers its probe
async fn ready_check(State(relay): State<RelayState>) -> (StatusCode, Json<Value>) {
    let backend = relay.backend();
    let (status, label) = match backend.health_check().await {
        Ok(true) => (StatusCode::OK, "ready"),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        Err(e) => {
            tracing::warn!("Backend health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": label,
            "provider": backend.provider_name(),
            "model": backend.model(),
        })),
    )
}
