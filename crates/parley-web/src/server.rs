use crate::assets::static_routes;
use crate::routes::{chat_routes, health_routes};
use crate::services::{RelayService, RelayState};
use crate::{Result, WebError};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use parley_config::{Config, WebConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Assemble the relay router: chat, health and optional static assets
pub fn build_router(state: RelayState, config: &WebConfig) -> Result<Router> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| WebError::Config(format!("Invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .merge(chat_routes(state.clone()))
        .merge(health_routes(state))
        .merge(static_routes(config.static_dir.as_deref()))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors))
}

/// Serve `app` on `listener` until `shutdown` is cancelled
pub async fn serve(listener: TcpListener, app: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Starting relay on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Relay on {} stopped", addr);
    Ok(())
}

/// Create the configured backend, bind and serve until `shutdown`
pub async fn start_server(config: &Config, shutdown: CancellationToken) -> Result<()> {
    let backend = parley_llm::create_backend(&config.chat)
        .map_err(|e| WebError::Config(e.to_string()))?;
    let state = Arc::new(RelayService::new(backend, config));
    let app = build_router(state, &config.web)?;

    let listener = TcpListener::bind(config.web.bind_address()).await?;
    serve(listener, app, shutdown).await
}
