#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::TimeDelta;
use http_body_util::BodyExt;
use sales_api::metrics::Metrics;
use sales_api::modules::users::memory::InMemoryStore;
use sales_api::router::init_router;
use sales_api::state::AppState;
use sales_auth::testutil;
use sales_config::CorsConfig;
use sales_web::ShutdownSignal;
use tokio::sync::mpsc;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "gophers";

pub struct TestApp {
    pub router: axum::Router,
    pub state: AppState,
    pub shutdown_rx: mpsc::Receiver<ShutdownSignal>,
}

pub fn test_state() -> AppState {
    let store = InMemoryStore::seeded(testutil::TEST_ISSUER, TimeDelta::hours(1)).unwrap();

    AppState {
        authority: Arc::new(testutil::authority()),
        store: Arc::new(store),
        metrics: Arc::new(Metrics::new()),
        build: "test".to_string(),
        request_timeout: Duration::from_secs(10),
    }
}

pub fn setup_test_app() -> TestApp {
    let state = test_state();
    let (tx, shutdown_rx) = mpsc::channel(1);
    let router = init_router(state.clone(), tx, &CorsConfig::default());

    TestApp {
        router,
        state,
        shutdown_rx,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn bearer(uri: &str, token: &str) -> Request<Body> {
    get_with_auth(uri, &format!("Bearer {token}"))
}

pub fn basic(uri: &str, email: &str, password: &str) -> Request<Body> {
    let encoded = STANDARD.encode(format!("{email}:{password}"));
    get_with_auth(uri, &format!("Basic {encoded}"))
}

pub fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in through the token endpoint.
pub async fn login(router: &axum::Router, email: &str, password: &str) -> String {
    use tower::ServiceExt;

    let response = router
        .clone()
        .oneshot(basic("/v1/users/token", email, password))
        .await
        .unwrap();
    assert_eq!(response.status(), 200, "login as {email}");

    body_json(response).await["token"].as_str().unwrap().to_string()
}
