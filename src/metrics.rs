//! Prometheus metrics for cascade loading and HTTP traffic.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Env files found and parsed.
pub const METRIC_ENV_SOURCES_LOADED: &str = "env_sources_loaded_total";
/// Env files that were not present.
pub const METRIC_ENV_SOURCES_MISSING: &str = "env_sources_missing_total";
/// Distinct variables applied from env files.
pub const METRIC_ENV_VARIABLES_APPLIED: &str = "env_variables_applied_total";
/// HTTP requests served.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_ENV_SOURCES_LOADED,
        "Total number of env files loaded"
    );
    describe_counter!(
        METRIC_ENV_SOURCES_MISSING,
        "Total number of env files not found"
    );
    describe_counter!(
        METRIC_ENV_VARIABLES_APPLIED,
        "Total number of variables applied from env files"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests served"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Increment loaded sources counter.
pub fn inc_sources_loaded() {
    counter!(METRIC_ENV_SOURCES_LOADED).increment(1);
}

/// Increment missing sources counter.
pub fn inc_sources_missing() {
    counter!(METRIC_ENV_SOURCES_MISSING).increment(1);
}

/// Add to applied variables counter.
pub fn add_variables_applied(count: u64) {
    counter!(METRIC_ENV_VARIABLES_APPLIED).increment(count);
}

/// Increment HTTP requests counter for an endpoint.
pub fn inc_http_requests(endpoint: &'static str) {
    counter!(METRIC_HTTP_REQUESTS, "endpoint" => endpoint).increment(1);
}
