use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Bound on the store status check behind `/debug/readiness`.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub build: String,
    pub host: String,
    pub pod: String,
    #[serde(rename = "podIP")]
    pub pod_ip: String,
    pub node: String,
    pub namespace: String,
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
}

fn env_or_unavailable(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| "unavailable".to_string())
}

/// GET /debug/liveness
pub async fn liveness(State(state): State<AppState>) -> Json<Liveness> {
    Json(Liveness {
        status: "up",
        build: state.build.clone(),
        host: env_or_unavailable("HOSTNAME"),
        pod: env_or_unavailable("KUBERNETES_PODNAME"),
        pod_ip: env_or_unavailable("KUBERNETES_NAMESPACE_POD_IP"),
        node: env_or_unavailable("KUBERNETES_NODENAME"),
        namespace: env_or_unavailable("KUBERNETES_NAMESPACE"),
    })
}

/// GET /debug/readiness
pub async fn readiness(State(state): State<AppState>) -> Response {
    match tokio::time::timeout(READINESS_TIMEOUT, state.store.status_check()).await {
        Ok(Ok(())) => (StatusCode::OK, Json(Readiness { status: "ok" })).into_response(),
        Ok(Err(err)) => {
            warn!(error = %err, "readiness check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Readiness { status: "not ready" })).into_response()
        }
        Err(_) => {
            warn!(timeout_ms = READINESS_TIMEOUT.as_millis() as u64, "readiness check timed out");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Readiness { status: "not ready" })).into_response()
        }
    }
}

/// GET /debug/vars
pub async fn vars(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
