//! Request-scoped state threaded through the handler chain.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use chrono::{DateTime, Utc};
use sales_auth::Claims;
use sales_core::ShutdownError;
use uuid::Uuid;

/// Values the [`App`](crate::App) creates for every request.
#[derive(Debug)]
pub struct Values {
    pub trace_id: String,
    pub now: DateTime<Utc>,
    status_code: AtomicU16,
}

impl Values {
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            now: Utc::now(),
            status_code: AtomicU16::new(0),
        }
    }

    /// Status written by [`respond`](crate::respond), or 0 before that.
    pub fn status_code(&self) -> u16 {
        self.status_code.load(Ordering::Relaxed)
    }

    pub(crate) fn set_status_code(&self, status: u16) {
        self.status_code.store(status, Ordering::Relaxed);
    }
}

impl Default for Values {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-request context.
///
/// Owned by one request's chain. Cloning shares the same [`Values`], so a
/// status written deep in the chain is visible to outer middleware.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: Option<Arc<Values>>,
    claims: Option<Arc<Claims>>,
}

impl Context {
    pub fn new(values: Values) -> Self {
        Self {
            values: Some(Arc::new(values)),
            claims: None,
        }
    }

    /// The request's values.
    ///
    /// A context built outside the [`App`](crate::App) has none; that is
    /// framework misuse and is reported as a [`ShutdownError`].
    pub fn values(&self) -> Result<&Values, ShutdownError> {
        self.values
            .as_deref()
            .ok_or_else(|| ShutdownError::new("web values missing from context"))
    }

    /// Trace id for logging, empty when there are no values.
    pub fn trace_id(&self) -> &str {
        self.values.as_deref().map(|v| v.trace_id.as_str()).unwrap_or("")
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_deref()
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(Arc::new(claims));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::errors::is_shutdown;

    #[test]
    fn test_missing_values_is_shutdown() {
        let ctx = Context::default();
        let err: anyhow::Error = ctx.values().unwrap_err().into();
        assert!(is_shutdown(&err));
        assert_eq!(ctx.trace_id(), "");
    }

    #[test]
    fn test_clones_share_status() {
        let ctx = Context::new(Values::new());
        let inner = ctx.clone();

        inner.values().unwrap().set_status_code(204);
        assert_eq!(ctx.values().unwrap().status_code(), 204);
    }

    #[test]
    fn test_trace_ids_are_unique() {
        assert_ne!(Values::new().trace_id, Values::new().trace_id);
    }
}
