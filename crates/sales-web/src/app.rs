//! The application router.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, on};
use sales_core::errors::{is_shutdown, translate};
use tokio::sync::mpsc;
use tracing::error;

use crate::context::{Context, Values};
use crate::handler::{Handler, Middleware, wrap_middleware};

/// Request that the process shut down, carrying the error that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownSignal {
    pub reason: String,
}

/// Entry point of the HTTP surface: routes plus app-wide middleware.
pub struct App {
    router: Router,
    middleware: Vec<Arc<dyn Middleware>>,
    shutdown: mpsc::Sender<ShutdownSignal>,
}

impl App {
    /// `middleware` wraps every route, first entry outermost.
    pub fn new(shutdown: mpsc::Sender<ShutdownSignal>, middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            router: Router::new(),
            middleware,
            shutdown,
        }
    }

    /// Registers `handler` for `method` at `/{group}{path}`, or at `path`
    /// when `group` is empty.
    ///
    /// `mw` wraps the handler first; the app-wide middleware wraps the
    /// result.
    pub fn handle(
        &mut self,
        method: MethodFilter,
        group: &str,
        path: &str,
        handler: Handler,
        mw: Vec<Arc<dyn Middleware>>,
    ) {
        let handler = wrap_middleware(&mw, handler);
        let handler = wrap_middleware(&self.middleware, handler);
        let shutdown = self.shutdown.clone();

        let route = move |req: Request| {
            let handler = handler.clone();
            let shutdown = shutdown.clone();
            async move { dispatch(handler, shutdown, req).await }
        };

        let full_path = if group.is_empty() {
            path.to_string()
        } else {
            format!("/{group}{path}")
        };

        self.router = std::mem::take(&mut self.router).route(&full_path, on(method, route));
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn dispatch(handler: Handler, shutdown: mpsc::Sender<ShutdownSignal>, req: Request) -> Response {
    let ctx = Context::new(Values::new());

    match handler.call(ctx.clone(), req).await {
        Ok(resp) => resp,
        Err(err) => {
            if is_shutdown(&err) {
                error!(trace_id = %ctx.trace_id(), error = %err, "shutdown requested by handler");
                signal(&shutdown, err.to_string());
            }

            // Reached only when the chain has no error middleware or the
            // error must escape it.
            let (status, body) = translate(&err);
            (status, axum::Json(body)).into_response()
        }
    }
}

fn signal(shutdown: &mpsc::Sender<ShutdownSignal>, reason: String) {
    if let Err(mpsc::error::TrySendError::Closed(_)) = shutdown.try_send(ShutdownSignal { reason }) {
        error!("shutdown channel closed");
    }
}
