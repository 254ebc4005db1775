//! Middleware applied by the API router.
//!
//! App-wide, outermost first: [`logger`], [`errors`], [`metrics`],
//! [`panics`], [`timeout`]. Per route: [`authenticate`], then [`authorize`].

pub mod auth;
pub mod errors;
pub mod logger;
pub mod metrics;
pub mod panics;
pub mod timeout;

pub use auth::{authenticate, authorize};
pub use errors::errors;
pub use logger::logger;
pub use metrics::metrics;
pub use panics::panics;
pub use timeout::timeout;
