//! Request helpers: JSON bodies, path parameters and Basic credentials.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::RequestExt;
use axum::extract::{Path, Request};
use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sales_core::RequestError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Largest body [`decode`] will read.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Reads the body as JSON into `T` and validates it.
///
/// An unreadable or undecodable body is a 400 [`RequestError`]; a body that
/// decodes but fails validation is a [`FieldErrors`](sales_core::FieldErrors).
pub async fn decode<T>(req: Request) -> anyhow::Result<T>
where
    T: DeserializeOwned + Validate,
{
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| RequestError::bad_request(anyhow!("unable to read payload: {e}")))?;

    let value: T = serde_json::from_slice(&bytes)
        .map_err(|e| RequestError::bad_request(anyhow!("unable to decode payload: {e}")))?;

    sales_core::validate::check(&value)?;
    Ok(value)
}

/// Path parameters of the matched route.
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Like [`Params::get`], failing with a 400 when `name` is absent.
    pub fn require(&self, name: &str) -> Result<&str, RequestError> {
        self.get(name)
            .ok_or_else(|| RequestError::bad_request(anyhow!("missing path parameter {name}")))
    }
}

/// Extracts the path parameters captured by the route.
pub async fn params(req: &mut Request) -> anyhow::Result<Params> {
    let Path(map) = req
        .extract_parts::<Path<HashMap<String, String>>>()
        .await
        .map_err(|e| RequestError::bad_request(anyhow!("{e}")))?;
    Ok(Params(map))
}

/// Returns the `(user, password)` pair of an `Authorization: Basic` header.
pub fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;

    Some((user.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, StatusCode};
    use sales_core::{FieldErrors, cause};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NewProduct {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 0, message = "cost must not be negative"))]
        cost: i64,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_decode_valid() {
        let product: NewProduct = decode(json_request(r#"{"name":"Comic Books","cost":50}"#))
            .await
            .unwrap();
        assert_eq!(product.name, "Comic Books");
        assert_eq!(product.cost, 50);
    }

    #[tokio::test]
    async fn test_decode_invalid_fields() {
        let err = decode::<NewProduct>(json_request(r#"{"name":"","cost":-1}"#))
            .await
            .unwrap_err();

        let fields = cause::<FieldErrors>(&err).unwrap();
        assert_eq!(fields.0.len(), 2);
        assert_eq!(fields.0[0].field, "cost");
        assert_eq!(fields.0[1].error, "name is required");
    }

    #[tokio::test]
    async fn test_decode_bad_json_is_bad_request() {
        let err = decode::<NewProduct>(json_request("{not json")).await.unwrap_err();
        assert_eq!(cause::<RequestError>(&err).unwrap().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_basic_auth() {
        let mut headers = HeaderMap::new();
        let encoded = STANDARD.encode("admin@example.com:gophers");
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
        );

        assert_eq!(
            basic_auth(&headers),
            Some(("admin@example.com".to_string(), "gophers".to_string()))
        );
    }

    #[test]
    fn test_basic_auth_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        assert_eq!(basic_auth(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(basic_auth(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert_eq!(basic_auth(&headers), None);
    }

    #[test]
    fn test_params_require() {
        let params = Params(HashMap::from([("id".to_string(), "42".to_string())]));
        assert_eq!(params.require("id").unwrap(), "42");
        assert_eq!(params.require("page").unwrap_err().status, StatusCode::BAD_REQUEST);
    }
}
