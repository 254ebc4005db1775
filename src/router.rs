use axum::Router;
use axum::http::{HeaderValue, Method, header};
use metrics_exporter_prometheus::PrometheusHandle;
use sales_config::CorsConfig;
use sales_web::{App, ShutdownSignal};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;

use crate::middleware::{errors, logger, metrics, panics, timeout};
use crate::modules::check::router::init_check_router;
use crate::modules::{smoke, users};
use crate::state::AppState;

/// Builds the API router. A handler returning a shutdown error sends on
/// `shutdown`.
pub fn init_router(state: AppState, shutdown: mpsc::Sender<ShutdownSignal>, cors: &CorsConfig) -> Router {
    let mut app = App::new(
        shutdown,
        vec![
            logger(),
            errors(),
            metrics(state.metrics.clone()),
            panics(state.metrics.clone()),
            timeout(state.request_timeout),
        ],
    );

    smoke::router::register(&mut app, &state);
    users::router::register(&mut app, &state);

    app.into_router().layer(cors_layer(cors))
}

/// Builds the debug router: probes, counters and Prometheus exposition.
pub fn init_debug_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    init_check_router(state, prometheus)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
