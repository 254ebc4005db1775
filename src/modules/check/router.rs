use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;

use super::controller;
use crate::state::AppState;

/// Routes served on the debug listener. `/metrics` is mounted only when a
/// Prometheus recorder was installed.
pub fn init_check_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let router = Router::new()
        .route("/debug/liveness", get(controller::liveness))
        .route("/debug/readiness", get(controller::readiness))
        .route("/debug/vars", get(controller::vars))
        .with_state(state);

    match prometheus {
        Some(handle) => router.route("/metrics", get(move || async move { handle.render() })),
        None => router,
    }
}
