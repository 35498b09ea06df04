//! Static serving of the landing page build

use axum::{http::StatusCode, routing::get_service, Router};
use tower_http::services::ServeDir;

/// Fallback router serving `dir`, or nothing when no directory is configured
pub fn static_routes(static_dir: Option<&str>) -> Router {
    match static_dir {
        Some(dir) => {
            tracing::info!("Serving static assets from: {}", dir);
            Router::new().fallback_service(
                get_service(ServeDir::new(dir).append_index_html_on_directories(true))
                    .handle_error(|_| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
        }
        None => Router::new(),
    }
}
