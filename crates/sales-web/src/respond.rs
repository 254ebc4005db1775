//! Response helpers.

use anyhow::Context as _;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use sales_core::ErrorResponse;
use serde::Serialize;

use crate::context::Context;

/// Encodes `data` as JSON with `status` and records the status in the
/// request's values. `204 No Content` is sent without a body.
pub fn respond<T>(ctx: &Context, data: &T, status: StatusCode) -> anyhow::Result<Response>
where
    T: Serialize + ?Sized,
{
    ctx.values()?.set_status_code(status.as_u16());

    if status == StatusCode::NO_CONTENT {
        return Response::builder()
            .status(status)
            .body(Body::empty())
            .context("building empty response");
    }

    let body = serde_json::to_vec(data).context("encoding response body")?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .context("building response")
}

/// Sends an error body.
pub fn respond_error(ctx: &Context, body: &ErrorResponse, status: StatusCode) -> anyhow::Result<Response> {
    respond(ctx, body, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Values;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_respond_json() {
        let ctx = Context::new(Values::new());
        let resp = respond(&ctx, &serde_json::json!({ "status": "OK" }), StatusCode::OK).unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(ctx.values().unwrap().status_code(), 200);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"status":"OK"}"#);
    }

    #[tokio::test]
    async fn test_respond_no_content_has_empty_body() {
        let ctx = Context::new(Values::new());
        let resp = respond(&ctx, &(), StatusCode::NO_CONTENT).unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_respond_without_values_fails() {
        let err = respond(&Context::default(), &(), StatusCode::OK).unwrap_err();
        assert!(sales_core::errors::is_shutdown(&err));
    }
}
