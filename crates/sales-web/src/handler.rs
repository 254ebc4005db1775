//! Handler and middleware types.

use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;
use futures::future::BoxFuture;

use crate::context::Context;

type HandlerFn = dyn Fn(Context, Request) -> BoxFuture<'static, anyhow::Result<Response>> + Send + Sync;

/// A request handler. Cheap to clone.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
    {
        Self(Arc::new(move |ctx, req| Box::pin(f(ctx, req))))
    }

    pub fn call(&self, ctx: Context, req: Request) -> BoxFuture<'static, anyhow::Result<Response>> {
        (self.0)(ctx, req)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler")
    }
}

/// Wraps a handler with additional behavior.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Wraps `handler` so that `mw[0]` is the outermost layer.
pub fn wrap_middleware(mw: &[Arc<dyn Middleware>], handler: Handler) -> Handler {
    mw.iter().rev().fold(handler, |next, m| m.wrap(next))
}
