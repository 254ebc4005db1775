//! # Sales Web
//!
//! A small layer over axum that gives every route the same request
//! lifecycle:
//!
//! - [`Handler`]: an async function of a [`Context`] and the request,
//!   returning `anyhow::Result<Response>`
//! - [`Middleware`]: a decorator turning one [`Handler`] into another
//! - [`App`]: binds method and path to a handler, composes per-route
//!   middleware inside the app-wide middleware, creates the per-request
//!   [`Values`] and turns a shutdown error into a [`ShutdownSignal`]
//! - [`respond`], [`decode`], [`params`] and [`basic_auth`]: request and
//!   response helpers
//!
//! # Composition
//!
//! ```text
//! app-wide[0]( app-wide[1]( ... route[0]( route[1]( handler ) ) ) )
//! ```
//!
//! The first middleware in a list is the outermost. At runtime app-wide
//! middleware runs first, then the route's, then the handler; results
//! unwind in reverse.
//!
//! # Example
//!
//! ```ignore
//! use axum::routing::MethodFilter;
//! use sales_web::{App, Handler, respond};
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(1);
//! let mut app = App::new(tx, vec![logger, errors, metrics, panics]);
//!
//! app.handle(MethodFilter::GET, "v1", "/test", Handler::new(|ctx, _req| async move {
//!     respond(&ctx, &serde_json::json!({ "status": "OK" }), StatusCode::OK)
//! }), vec![]);
//!
//! let router = app.into_router();
//! ```

pub mod app;
pub mod context;
pub mod handler;
pub mod request;
pub mod respond;

// Re-export commonly used types at crate root
pub use app::{App, ShutdownSignal};
pub use context::{Context, Values};
pub use handler::{Handler, Middleware, wrap_middleware};
pub use request::{Params, basic_auth, decode, params};
pub use respond::{respond, respond_error};
