use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::response::Response;
use sales_auth::TokenAuthority;
use sales_web::{Context, Handler};

use crate::metrics::Metrics;
use crate::modules::users::store::UserStore;

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub store: Arc<dyn UserStore>,
    pub metrics: Arc<Metrics>,
    /// Build tag reported on `/debug/liveness`.
    pub build: String,
    pub request_timeout: Duration,
}

impl AppState {
    /// Binds a controller function to this state.
    pub fn handler<F, Fut>(&self, f: F) -> Handler
    where
        F: Fn(AppState, Context, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
    {
        let state = self.clone();
        Handler::new(move |ctx, req| f(state.clone(), ctx, req))
    }
}
