use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::anyhow;
use futures::FutureExt;
use sales_web::{Handler, Middleware};
use tracing::error;

use crate::metrics::Metrics;

/// Converts a panic anywhere below into an ordinary error.
///
/// The error carries no client-facing status, so it is answered with a
/// generic 500 while the payload is logged.
pub fn panics(metrics: Arc<Metrics>) -> Arc<dyn Middleware> {
    Arc::new(move |next: Handler| {
        let metrics = metrics.clone();
        Handler::new(move |ctx, req| {
            let next = next.clone();
            let metrics = metrics.clone();
            async move {
                let trace_id = ctx.trace_id().to_string();
                let call = async move { next.call(ctx, req).await };

                match AssertUnwindSafe(call).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => {
                        metrics.add_panic();
                        let message = panic_message(payload.as_ref());
                        error!(trace_id = %trace_id, panic = %message, "recovered from panic");
                        Err(anyhow!("PANIC [{message}]"))
                    }
                }
            }
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
