//! Health, API docs, and shared application state.
//!
//! `AppState` owns the shared browser handle together with the runtime
//! counters the handlers report: uptime, processed screenshots, errors,
//! and a latency histogram.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::browser::{BrowserConfig, SharedBrowser};

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (always "ok" if responding)
    pub status: String,

    /// ISO8601 timestamp of when the check ran
    pub timestamp: String,

    /// Server uptime in seconds
    pub uptime_seconds: u64,

    /// Total screenshots rendered since startup
    pub screenshots_processed: u64,

    /// Render latency percentiles
    pub latency: LatencyMetrics,
}

/// Render latency percentile metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// 50th percentile (median) latency in milliseconds
    pub p50_ms: f64,

    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,

    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,

    /// Total number of renders recorded
    pub total_requests: u64,

    /// Mean latency in milliseconds
    pub mean_ms: f64,

    /// Maximum latency recorded in milliseconds
    pub max_ms: f64,
}

// ============================================================================
// Latency Histogram
// ============================================================================

/// Thread-safe latency histogram for recording render timings.
///
/// Tracks latencies from 1 microsecond to 60 seconds with 3 significant
/// figures; values outside the bounds are silently dropped.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        let histogram =
            Histogram::new_with_bounds(1, 60_000_000, 3).expect("Failed to create histogram");
        Self {
            inner: RwLock::new(histogram),
        }
    }

    /// Record a latency duration.
    pub fn record(&self, duration: std::time::Duration) {
        let mut hist = self.inner.write();
        let _ = hist.record(duration.as_micros() as u64);
    }

    /// Get the total count of recorded values.
    pub fn count(&self) -> u64 {
        self.inner.read().len()
    }

    /// Snapshot the percentiles in milliseconds.
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        LatencyMetrics {
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            total_requests: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state.
///
/// Owns the shared browser handle and the runtime counters. All fields
/// are safe for concurrent access: the browser handle locks internally,
/// counters are atomics, the histogram is RwLock-wrapped.
pub struct AppState {
    /// Shared browser handle, lazily launched by the first render
    browser: SharedBrowser,

    /// Server start time for uptime calculation
    start_time: Instant,

    /// Total screenshots rendered
    screenshots_processed: AtomicU64,

    /// Total render failures
    error_count: AtomicU64,

    /// Render latency histogram
    latency: LatencyHistogram,
}

impl AppState {
    /// Create state with an un-launched browser handle.
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            browser: SharedBrowser::new(config),
            start_time: Instant::now(),
            screenshots_processed: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            latency: LatencyHistogram::new(),
        }
    }

    /// The shared browser handle.
    pub fn browser(&self) -> &SharedBrowser {
        &self.browser
    }

    /// Server uptime in seconds.
    #[inline]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Total screenshots rendered.
    #[inline]
    pub fn screenshots_processed(&self) -> u64 {
        self.screenshots_processed.load(Ordering::Relaxed)
    }

    /// Increment the screenshot counter and return the new value.
    #[inline]
    pub fn record_screenshot(&self) -> u64 {
        self.screenshots_processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Total render failures.
    #[inline]
    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Increment the error counter and return the new value.
    #[inline]
    pub fn record_error(&self) -> u64 {
        self.error_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a render latency.
    #[inline]
    pub fn record_latency(&self, duration: std::time::Duration) {
        self.latency.record(duration);
    }

    /// Snapshot the latency percentiles.
    #[inline]
    pub fn latency_metrics(&self) -> LatencyMetrics {
        self.latency.metrics()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// Health check endpoint handler.
///
/// # Route
/// `GET /health`
///
/// # Response
/// - `200 OK` with status, timestamp, uptime, and render counters
#[instrument(skip_all)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        screenshots_processed: state.screenshots_processed(),
        latency: state.latency_metrics(),
    };

    (StatusCode::OK, Json(response))
}

/// API documentation endpoint handler.
///
/// Serves a static JSON description of the screenshot endpoint so the
/// API is explorable without the form frontend.
///
/// # Route
/// `GET /api-docs`
#[instrument(skip_all)]
pub async fn api_docs_handler() -> impl IntoResponse {
    let docs = json!({
        "title": "Screenshot API Documentation",
        "version": SERVER_VERSION,
        "endpoints": {
            "/screenshot": {
                "method": "GET",
                "description": "Take a screenshot of a webpage",
                "parameters": {
                    "url": {
                        "type": "string",
                        "required": true,
                        "description": "URL of the webpage to screenshot"
                    },
                    "width": {
                        "type": "number",
                        "required": false,
                        "default": 1200,
                        "description": "Screenshot width in pixels (1-4000)"
                    },
                    "height": {
                        "type": "number",
                        "required": false,
                        "default": 800,
                        "description": "Screenshot height in pixels (1-4000)"
                    },
                    "format": {
                        "type": "string",
                        "required": false,
                        "default": "png",
                        "enum": ["png", "jpeg"],
                        "description": "Image format"
                    },
                    "quality": {
                        "type": "number",
                        "required": false,
                        "default": 90,
                        "description": "JPEG quality (1-100, only for jpeg format)"
                    },
                    "fullPage": {
                        "type": "boolean",
                        "required": false,
                        "default": false,
                        "description": "Capture full page or just viewport"
                    }
                }
            }
        }
    });

    (StatusCode::OK, Json(docs))
}

// ============================================================================
// Tests
// ============================================================================
