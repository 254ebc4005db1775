use std::sync::Arc;

use sales_core::errors::{is_shutdown, translate};
use sales_web::{Handler, Middleware, respond_error};
use tracing::{error, warn};

/// Turns any error from the chain into a JSON response.
///
/// The client sees only the translated body; the full error chain is
/// logged with the trace id. A shutdown error is answered and then returned
/// so the [`App`](sales_web::App) can signal the process.
pub fn errors() -> Arc<dyn Middleware> {
    Arc::new(|next: Handler| {
        Handler::new(move |ctx, req| {
            let next = next.clone();
            async move {
                let err = match next.call(ctx.clone(), req).await {
                    Ok(resp) => return Ok(resp),
                    Err(err) => err,
                };

                let (status, body) = translate(&err);
                if status.is_server_error() {
                    error!(trace_id = %ctx.trace_id(), status = status.as_u16(), error = %format!("{err:#}"), "request failed");
                } else {
                    warn!(trace_id = %ctx.trace_id(), status = status.as_u16(), error = %format!("{err:#}"), "request rejected");
                }

                let resp = respond_error(&ctx, &body, status)?;

                if is_shutdown(&err) {
                    return Err(err);
                }
                Ok(resp)
            }
        })
    })
}
