//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cascade::{EnvLookup, Provenance, Tier};
use crate::config::REPORTED_VARIABLES;
use crate::metrics;
use crate::service::ServiceName;

/// Application state shared with handlers.
///
/// Everything here is fixed before the listener starts, so handlers only read.
#[derive(Clone)]
pub struct AppState {
    /// Running service.
    pub service: ServiceName,
    /// Listen port.
    pub port: u16,
    /// Resolved environment.
    pub environment: Arc<dyn EnvLookup + Send + Sync>,
    /// Names defined per tier.
    pub provenance: Arc<Provenance>,
    /// Prometheus handle, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        service: ServiceName,
        port: u16,
        environment: impl EnvLookup + Send + Sync + 'static,
        provenance: Provenance,
    ) -> Self {
        Self {
            service,
            port,
            environment: Arc::new(environment),
            provenance: Arc::new(provenance),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the metrics endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Running service.
    pub service: ServiceName,
    /// Listen port.
    pub port: u16,
}

/// Root response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Running service.
    pub service: ServiceName,
    /// Listen port.
    pub port: u16,
    /// Reported variables and their resolved values, in reporting order.
    pub environment: Map<String, Value>,
    /// Env files in tier order.
    pub sources: Vec<SourceResponse>,
}

/// One env file in the root response.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    /// Tier rank.
    pub tier: Tier,
    /// Tier name.
    pub label: String,
    /// File path.
    pub path: String,
    /// Whether the file was found.
    pub existed: bool,
    /// Names defined by the file, in file order.
    pub variables: Vec<String>,
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_http_requests("/health");

    Json(HealthResponse {
        status: "ok",
        service: state.service,
        port: state.port,
    })
}

/// Root handler - reports resolved variables and where they were defined.
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_http_requests("/");
    Json(root_response(&state))
}

/// Build the root response body.
pub fn root_response(state: &AppState) -> RootResponse {
    let environment = REPORTED_VARIABLES
        .iter()
        .map(|name| {
            let value = state.environment.lookup(name).map_or(Value::Null, Value::from);
            (name.to_string(), value)
        })
        .collect();

    let sources = state
        .provenance
        .iter()
        .map(|loaded| SourceResponse {
            tier: loaded.source.tier,
            label: loaded.source.label.clone(),
            path: loaded.source.path.display().to_string(),
            existed: loaded.parsed.existed,
            variables: state.provenance.variables(loaded.source.tier).to_vec(),
        })
        .collect();

    RootResponse {
        service: state.service,
        port: state.port,
        environment,
        sources,
    }
}

/// Metrics handler - Prometheus text format, 404 without a recorder.
pub async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}
