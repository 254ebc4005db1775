use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::http::StatusCode;
use sales_core::RequestError;
use sales_web::{Handler, Middleware};

/// Fails a request that takes longer than `limit` with a 503.
pub fn timeout(limit: Duration) -> Arc<dyn Middleware> {
    Arc::new(move |next: Handler| {
        Handler::new(move |ctx, req| {
            let next = next.clone();
            async move {
                tokio::time::timeout(limit, next.call(ctx, req))
                    .await
                    .map_err(|_| {
                        RequestError::new(StatusCode::SERVICE_UNAVAILABLE, anyhow!("request timed out"))
                    })?
            }
        })
    })
}
