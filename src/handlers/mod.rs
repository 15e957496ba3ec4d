//! HTTP endpoint layer
//!
//! Axum handlers for the screenshot API plus health/docs endpoints, and
//! the router that wires them together with the static frontend.

pub mod screenshot;
pub mod status;

pub use screenshot::{screenshot_handler, ErrorBody};
pub use status::{api_docs_handler, health_handler, AppState};

use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

/// Build the application router.
///
/// Routes: `/screenshot`, `/health`, `/api-docs`, the form frontend at
/// `/`, and its assets under `/static`.
pub fn router(state: Arc<AppState>, assets: &Path) -> Router {
    Router::new()
        .route("/screenshot", get(screenshot_handler))
        .route("/health", get(health_handler))
        .route("/api-docs", get(api_docs_handler))
        .route_service("/", ServeFile::new(assets.join("index.html")))
        .nest_service("/static", ServeDir::new(assets))
        .with_state(state)
}
