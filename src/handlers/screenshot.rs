//! The screenshot endpoint.
//!
//! Validates query parameters, drives the render, and translates both
//! outcomes into the HTTP contract: 400 for rejected parameters, 500 for
//! render failures, 200 with downloadable image bytes on success.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::browser;
use crate::handlers::AppState;
use crate::request::ScreenshotRequest;

/// JSON error body: `{ "error": string, "message"?: string }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error description
    pub error: String,

    /// Underlying detail, present on render failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Body with just the short description
    pub fn new<S: Into<String>>(error: S) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// Body with the short description plus underlying detail
    pub fn with_detail<S: Into<String>, D: Into<String>>(error: S, detail: D) -> Self {
        Self {
            error: error.into(),
            message: Some(detail.into()),
        }
    }
}

/// Screenshot endpoint handler.
///
/// # Route
/// `GET /screenshot?url=…&width=…&height=…&format=…&quality=…&fullPage=…`
///
/// # Responses
/// - `200 OK` — image bytes, `Content-Type` per format,
///   `Content-Disposition` attachment with a `<host>_<timestamp>.<ext>` name
/// - `400 Bad Request` — JSON error body with the validation message
/// - `500 Internal Server Error` — JSON error body with render detail
#[instrument(skip_all)]
pub async fn screenshot_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request = match ScreenshotRequest::from_query(&params) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected screenshot request: {}", e);
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response();
        }
    };

    let started = Instant::now();
    match browser::render(state.browser(), &request).await {
        Ok(image) => {
            state.record_screenshot();
            state.record_latency(started.elapsed());

            let headers = [
                (
                    header::CONTENT_TYPE,
                    request.format().mime_type().to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", request.filename()),
                ),
            ];
            (StatusCode::OK, headers, image).into_response()
        }
        Err(e) => {
            error!("Screenshot failed for {}: {}", request.url(), e);
            state.record_error();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::with_detail("Failed to take screenshot", e.to_string())),
            )
                .into_response()
        }
    }
}
