//! Error taxonomy shared by handlers and middlewares.
//!
//! Handlers return `anyhow::Result<Response>`. The concrete types in this
//! module travel inside the `anyhow::Error` and decide how the failure is
//! presented to the client:
//!
//! - [`FieldErrors`]: one or more named-field validation failures, always 400
//! - [`RequestError`]: a client-facing error carrying its own HTTP status
//! - [`ShutdownError`]: the sentinel that asks the process to shut down
//!
//! Anything else is an unclassified failure and becomes a generic 500.
//! [`cause`] recovers the classifying type even when intermediate layers
//! wrapped the error with additional context.

use std::fmt;

use anyhow::Error;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Client-facing error with an explicit HTTP status.
///
/// The display text of the wrapped error is sent to the client, so it must
/// never contain internal details.
#[derive(Debug)]
pub struct RequestError {
    pub status: StatusCode,
    pub error: Error,
}

impl RequestError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.error)
    }
}

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

/// Collection of field validation failures. Displays as its JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, field: impl Into<String>, error: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            error: error.into(),
        });
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(encoded) => f.write_str(&encoded),
            Err(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FieldErrors {}

/// Sentinel for conditions the process cannot recover from.
///
/// It must only be raised for framework misuse (missing request values and
/// the like), never for ordinary client errors.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ShutdownError {
    pub message: String,
}

impl ShutdownError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Finds the first error of type `T` in the chain of `err`.
pub fn cause<T>(err: &Error) -> Option<&T>
where
    T: std::error::Error + Send + Sync + 'static,
{
    err.downcast_ref::<T>()
        .or_else(|| err.chain().find_map(|e| e.downcast_ref::<T>()))
}

pub fn is_shutdown(err: &Error) -> bool {
    cause::<ShutdownError>(err).is_some()
}

/// Wire body for every error response.
///
/// `fields` holds the JSON text of the failed field list, not a nested
/// array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

/// Classifies `err` into the status and body the client receives.
pub fn translate(err: &Error) -> (StatusCode, ErrorResponse) {
    if let Some(fields) = cause::<FieldErrors>(err) {
        return (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: "data validation error".to_string(),
                fields: Some(fields.to_string()),
            },
        );
    }

    if let Some(request) = cause::<RequestError>(err) {
        return (
            request.status,
            ErrorResponse {
                error: request.to_string(),
                fields: None,
            },
        );
    }

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string(),
            fields: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn test_translate_field_errors() {
        let mut fields = FieldErrors::default();
        fields.push("email", "email must be a valid email address");
        let err: Error = fields.into();

        let (status, body) = translate(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "data validation error");
        assert_eq!(
            body.fields.as_deref(),
            Some(r#"[{"field":"email","error":"email must be a valid email address"}]"#)
        );

        let wire = serde_json::to_value(&body).unwrap();
        assert!(wire["fields"].is_string());
    }

    #[test]
    fn test_translate_request_error_keeps_status() {
        let err: Error = RequestError::not_found(anyhow!("user not found")).into();

        let (status, body) = translate(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "user not found");
        assert!(body.fields.is_none());
    }

    #[test]
    fn test_translate_unclassified_is_generic() {
        let err = anyhow!("connection reset by peer");

        let (status, body) = translate(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
    }

    #[test]
    fn test_cause_survives_context() {
        let err: Error = RequestError::forbidden(anyhow!("not yours")).into();
        let err = err.context("deleting user").context("handler");

        let found = cause::<RequestError>(&err).expect("request error in chain");
        assert_eq!(found.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_cause_through_result_context() {
        let result: Result<(), FieldErrors> = Err(FieldErrors(vec![FieldError {
            field: "name".into(),
            error: "name is required".into(),
        }]));
        let err = result.context("validating payload").unwrap_err();

        assert!(cause::<FieldErrors>(&err).is_some());
        assert_eq!(translate(&err).0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cause_reaches_error_wrapped_by_request_error() {
        let err: Error = RequestError::bad_request(crate::validate::InvalidId).into();

        assert_eq!(
            cause::<crate::validate::InvalidId>(&err),
            Some(&crate::validate::InvalidId)
        );
        assert_eq!(translate(&err).0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_is_shutdown() {
        let err: Error = ShutdownError::new("web values missing from context").into();
        assert!(is_shutdown(&err));
        assert!(is_shutdown(&err.context("outer")));
        assert!(!is_shutdown(&anyhow!("plain")));
    }

    #[test]
    fn test_field_errors_display_is_json() {
        let fields = FieldErrors(vec![FieldError {
            field: "roles".into(),
            error: "roles is required".into(),
        }]);
        assert_eq!(
            fields.to_string(),
            r#"[{"field":"roles","error":"roles is required"}]"#
        );
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let body = ErrorResponse {
            error: "nope".into(),
            fields: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"error":"nope"}"#);
    }
}
