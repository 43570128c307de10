//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::config::Config;
use crate::metrics::EXPOSITION_CONTENT_TYPE;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Prometheus handle for rendering the registry. None when recorder
    /// installation was skipped (tests) or failed.
    pub metrics: Option<PrometheusHandle>,
    /// Process start time, used for the health uptime field.
    started_at: Instant,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            config: Arc::new(config),
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Current time as an ISO 8601 / RFC 3339 UTC string with millisecond precision.
fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
    /// Current timestamp.
    pub timestamp: String,
    /// Process uptime in seconds.
    pub uptime: f64,
}

/// Readiness probe response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Status: "ready".
    pub status: &'static str,
    /// Current timestamp.
    pub timestamp: String,
}

/// Welcome response for the root route.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Welcome message.
    pub message: &'static str,
    /// Application version.
    pub version: String,
    /// Deployment environment name.
    pub environment: String,
    /// Map of the other endpoint paths.
    pub endpoints: EndpointList,
}

/// Endpoint paths advertised by the root route.
#[derive(Debug, Serialize)]
pub struct EndpointList {
    /// Health check path.
    pub health: &'static str,
    /// Readiness probe path.
    pub ready: &'static str,
    /// Metrics exposition path.
    pub metrics: &'static str,
    /// API prefix.
    pub api: &'static str,
}

/// Info response for `/api/v1/info`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Application name.
    pub app: &'static str,
    /// Application version.
    pub version: String,
    /// Deployment environment name.
    pub environment: String,
    /// Orchestration context.
    pub kubernetes: KubernetesInfo,
}

/// Kubernetes placement fields, sourced from configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesInfo {
    /// Namespace the pod runs in.
    pub namespace: String,
    /// Pod name.
    pub pod_name: String,
    /// Node name.
    pub node_name: String,
}

/// Generic error body for 404 and 500 responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: iso_timestamp(),
        uptime: state.uptime_seconds(),
    })
}

/// Readiness probe handler - always returns 200.
pub async fn ready() -> impl IntoResponse {
    Json(ReadyResponse {
        status: "ready",
        timestamp: iso_timestamp(),
    })
}

/// Metrics handler - renders the Prometheus registry in text exposition format.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "metrics recorder not installed".to_string(),
        )
            .into_response(),
    }
}

/// Root handler - static welcome JSON listing the other endpoints.
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to DevOps Demo Application",
        version: state.config.app_version.clone(),
        environment: state.config.node_env.clone(),
        endpoints: EndpointList {
            health: "/health",
            ready: "/ready",
            metrics: "/metrics",
            api: "/api/v1",
        },
    })
}

/// Info handler - app identity plus orchestration placement fields.
pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        app: env!("CARGO_PKG_NAME"),
        version: state.config.app_version.clone(),
        environment: state.config.node_env.clone(),
        kubernetes: KubernetesInfo {
            namespace: state.config.namespace.clone(),
            pod_name: state.config.pod_name.clone(),
            node_name: state.config.node_name.clone(),
        },
    })
}

/// Fallback handler for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: "Not Found" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_non_negative_and_monotonic() {
        let state = AppState::new(Config::default(), None);
        let first = state.uptime_seconds();
        assert!(first >= 0.0);

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(state.uptime_seconds() > first);
    }

    #[test]
    fn timestamps_are_utc_iso8601() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
