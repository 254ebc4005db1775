//! Authentication and authorization.
//!
//! [`authenticate`] verifies the bearer token and attaches its claims to the
//! context; [`authorize`] checks those claims against the roles a route
//! requires. Authorize must be chained after authenticate.

use std::sync::Arc;

use anyhow::anyhow;
use axum::http::header;
use sales_auth::{Role, TokenAuthority};
use sales_core::RequestError;
use sales_web::{Handler, Middleware};
use tracing::warn;

pub const EXPECTED_FORMAT: &str = "expected authorization header format: Bearer <token>";
pub const NOT_AUTHORIZED: &str = "you are not authorized for that action";

/// Requires `Authorization: Bearer <token>` with a token `authority`
/// accepts.
///
/// A header of any other shape is rejected without parsing the token.
/// Validation failures reach the client as a generic 401; the reason is
/// logged.
pub fn authenticate(authority: Arc<TokenAuthority>) -> Arc<dyn Middleware> {
    Arc::new(move |next: Handler| {
        let authority = authority.clone();
        Handler::new(move |ctx, req| {
            let next = next.clone();
            let authority = authority.clone();
            async move {
                let value = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();

                let token = bearer_token(value)
                    .ok_or_else(|| RequestError::unauthorized(anyhow!(EXPECTED_FORMAT)))?
                    .to_string();

                let claims = authority.validate(&token).map_err(|err| {
                    warn!(trace_id = %ctx.trace_id(), error = %err, "token rejected");
                    RequestError::unauthorized(anyhow!("invalid or expired token"))
                })?;

                next.call(ctx.with_claims(claims), req).await
            }
        })
    })
}

/// Requires the authenticated claims to hold at least one of `roles`.
pub fn authorize(roles: &[Role]) -> Arc<dyn Middleware> {
    let roles: Arc<[Role]> = roles.into();

    Arc::new(move |next: Handler| {
        let roles = roles.clone();
        Handler::new(move |ctx, req| {
            let next = next.clone();
            let roles = roles.clone();
            async move {
                let Some(claims) = ctx.claims() else {
                    return Err(RequestError::forbidden(anyhow!("{NOT_AUTHORIZED}, no claims")).into());
                };

                if !claims.authorized(&roles) {
                    warn!(
                        trace_id = %ctx.trace_id(),
                        subject = %claims.subject,
                        required = ?roles,
                        held = ?claims.roles,
                        "authorization failed"
                    );
                    return Err(RequestError::forbidden(anyhow!(NOT_AUTHORIZED)).into());
                }

                next.call(ctx, req).await
            }
        })
    })
}

/// Splits a header of exactly two space-separated fields with a
/// case-insensitive `Bearer` scheme.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    let (scheme, token) = (parts.next()?, parts.next()?);

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_shapes() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));

        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer abc def"), None);
        assert_eq!(bearer_token("Bearer  abc"), None);
    }
}
