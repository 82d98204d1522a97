//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Stream searches (outcome, duration, candidate and result counts)
//! - Provider query fan-out and detail enrichment
//! - External services (file provider, metadata lookup)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Stream search
// =============================================================================

/// Stream searches total by result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sharestream_searches_total", "Total stream searches"),
        &["result"], // "ok", "auth_failed", "all_queries_failed", "provider_error"
    )
    .unwrap()
});

/// Stream search duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sharestream_search_duration_seconds",
            "Duration of a complete stream search",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

/// Provider queries total by result.
pub static QUERIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sharestream_queries_total", "Total provider queries"),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

/// Unique candidates found per search.
pub static CANDIDATES_FOUND: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sharestream_candidates_found",
            "Number of unique candidates found per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]),
        &[],
    )
    .unwrap()
});

/// Streams returned per search.
pub static RESULTS_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sharestream_results_returned",
            "Number of streams returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &[],
    )
    .unwrap()
});

/// Detail fetches during enrichment by result.
pub static ENRICHMENT_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sharestream_enrichment_fetches_total",
            "Total detail fetches during enrichment",
        ),
        &["result"], // "ok", "missing", "error"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sharestream_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Record the outcome of one external call.
pub fn record_external<T, E>(service: &str, operation: &str, result: &Result<T, E>) {
    let status = if result.is_ok() { "success" } else { "error" };
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, status])
        .inc();
}

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(QUERIES_TOTAL.clone()),
        Box::new(CANDIDATES_FOUND.clone()),
        Box::new(RESULTS_RETURNED.clone()),
        Box::new(ENRICHMENT_FETCHES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
