//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Stream request and playback redirect outcomes
//!
//! Core search metrics are registered in the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sharestream_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sharestream_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "sharestream_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Stream Metrics
// =============================================================================

/// Stream requests by route and outcome.
pub static STREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sharestream_stream_requests_total", "Stream requests by outcome"),
        &["route", "result"], // result: "ok", "empty", "unauthorized", "unresolved"
    )
    .unwrap()
});

/// Playback redirects by outcome.
pub static PLAYBACK_REDIRECTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sharestream_playback_redirects_total",
            "Playback link resolutions",
        ),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Streams
    registry
        .register(Box::new(STREAM_REQUESTS.clone()))
        .unwrap();
    registry
        .register(Box::new(PLAYBACK_REDIRECTS.clone()))
        .unwrap();

    // Core metrics (search, enrichment, external services)
    for metric in sharestream_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

static PLAY_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/play/[^/]+$").unwrap());
static STREAMS_BY_ID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/api/v1/streams/[^/]+)/[^/]+$").unwrap());
static FILE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/api/v1/files/[^/]+$").unwrap());

/// Normalize a path for metric labels (replace file idents and media ids
/// with placeholders).
pub fn normalize_path(path: &str) -> String {
    if PLAY_PATH.is_match(path) {
        return "/play/{ident}".to_string();
    }
    if FILE_PATH.is_match(path) {
        return "/api/v1/files/{ident}".to_string();
    }
    STREAMS_BY_ID_PATH
        .replace(path, "$1/{media_id}")
        .to_string()
}
