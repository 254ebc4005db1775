use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ConnectInfo;
use sales_web::{Handler, Middleware};
use tracing::{error, info, warn};

/// Logs the start and completion of every request with its trace id.
pub fn logger() -> Arc<dyn Middleware> {
    Arc::new(|next: Handler| {
        Handler::new(move |ctx, req| {
            let next = next.clone();
            async move {
                let values = ctx.values()?;
                let trace_id = values.trace_id.clone();
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                let remote_addr = req
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.to_string())
                    .unwrap_or_default();

                info!(
                    trace_id = %trace_id,
                    method = %method,
                    path = %path,
                    remote_addr = %remote_addr,
                    "request started"
                );

                let start = Instant::now();
                let result = next.call(ctx.clone(), req).await;
                let latency_ms = start.elapsed().as_millis() as u64;
                let status = values.status_code();

                match status {
                    400..=499 => warn!(
                        trace_id = %trace_id,
                        method = %method,
                        path = %path,
                        status,
                        latency_ms,
                        "request completed"
                    ),
                    500..=599 => error!(
                        trace_id = %trace_id,
                        method = %method,
                        path = %path,
                        status,
                        latency_ms,
                        "request completed"
                    ),
                    _ => info!(
                        trace_id = %trace_id,
                        method = %method,
                        path = %path,
                        status,
                        latency_ms,
                        "request completed"
                    ),
                }

                result
            }
        })
    })
}
