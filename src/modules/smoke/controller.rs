use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use sales_web::{Context, respond};
use serde_json::json;

/// GET /v1/test and /v1/testauth
pub async fn status(ctx: Context, _req: Request) -> anyhow::Result<Response> {
    respond(&ctx, &json!({ "status": "OK" }), StatusCode::OK)
}
