//! Prometheus metrics for bouquet-service.
//!
//! Provides HTTP, generation outcome and provider latency metrics.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};
use std::time::Duration;

static INIT: Once = Once::new();

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Generation metrics
pub static BOUQUET_GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    let generations_total = IntCounterVec::new(
        Opts::new(
            "bouquet_generations_total",
            "Bouquet generation requests by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create bouquet_generations_total metric");

    // Image generation routinely takes tens of seconds
    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "bouquet_provider_latency_seconds",
            "External provider call latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["provider"],
    )
    .expect("Failed to create bouquet_provider_latency_seconds metric");

    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(generations_total.clone()))
        .expect("Failed to register bouquet_generations_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register bouquet_provider_latency_seconds");

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = BOUQUET_GENERATIONS_TOTAL.set(generations_total);
    let _ = PROVIDER_LATENCY_SECONDS.set(provider_latency);
}

/// Render all registered metrics in the Prometheus text format.
pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return "# Metrics registry not initialized\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status.as_str()]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, status.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}

/// Record the outcome of one `POST /api/generate`.
pub fn record_generation(outcome: &str) {
    if let Some(counter) = BOUQUET_GENERATIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn observe_provider_latency(provider: &str, elapsed: Duration) {
    if let Some(histogram) = PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider])
            .observe(elapsed.as_secs_f64());
    }
}
