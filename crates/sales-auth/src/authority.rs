//! Token issuance and validation.
//!
//! Tokens are JWTs signed with an RSA-family algorithm. The header carries
//! the `kid` of the signing key; validation resolves the *public* key for
//! that kid, so tokens signed under a key that has since been rotated out of
//! the active slot keep verifying for as long as the key stays in the store.
//!
//! Validation order:
//!
//! 1. header decodes and names a `kid`
//! 2. the `kid` resolves in the key store
//! 3. the signature verifies and the registered claims are present
//! 4. `not-before <= now <= expires-at`, with no leeway
//! 5. `expires-at` is after `issued-at`
//! 6. every role belongs to the known vocabulary
//!
//! A token whose signature fails is still reported as [`ValidationError::Expired`]
//! when its (unverified) expiry has passed. Its claims are never returned.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header, encode};
use serde::Deserialize;
use tracing::debug;

use crate::claims::{Claims, RawClaims};
use crate::error::{AuthorityError, ValidationError};
use crate::keystore::KeyLookup;

const SUPPORTED: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Issues and validates tokens against a [`KeyLookup`].
pub struct TokenAuthority {
    keys: Arc<dyn KeyLookup>,
    active_kid: String,
    algorithm: Algorithm,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("active_kid", &self.active_kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Builds an RS256 authority signing with `active_kid`.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::ActiveKeyMissing`] when `active_kid` has no private
    /// key in `keys`.
    pub fn new(keys: Arc<dyn KeyLookup>, active_kid: impl Into<String>) -> Result<Self, AuthorityError> {
        Self::with_algorithm(keys, active_kid, Algorithm::RS256)
    }

    /// Builds an authority with an explicit algorithm. Only the RSA families
    /// (`RS*`, `PS*`) are accepted.
    pub fn with_algorithm(
        keys: Arc<dyn KeyLookup>,
        active_kid: impl Into<String>,
        algorithm: Algorithm,
    ) -> Result<Self, AuthorityError> {
        if !SUPPORTED.contains(&algorithm) {
            return Err(AuthorityError::UnsupportedAlgorithm(format!("{algorithm:?}")));
        }

        let active_kid = active_kid.into();
        if let Err(source) = keys.private_key(&active_kid) {
            return Err(AuthorityError::ActiveKeyMissing {
                kid: active_kid,
                source,
            });
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        // Time bounds are checked against the caller's clock in `validate_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Ok(Self {
            keys,
            active_kid,
            algorithm,
            validation,
        })
    }

    /// Parses an algorithm name such as `RS256`.
    pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthorityError> {
        Algorithm::from_str(name)
            .ok()
            .filter(|alg| SUPPORTED.contains(alg))
            .ok_or_else(|| AuthorityError::UnsupportedAlgorithm(name.to_string()))
    }

    pub fn active_kid(&self) -> &str {
        &self.active_kid
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Signs `claims` with the active key and stamps its kid into the header.
    ///
    /// Claims that expire at or before their issue time are refused.
    pub fn issue(&self, claims: &Claims) -> Result<String, AuthorityError> {
        if claims.expires_at <= claims.issued_at {
            return Err(AuthorityError::InvalidLifetime {
                issued_at: claims.issued_at,
                expires_at: claims.expires_at,
            });
        }

        let key = self
            .keys
            .private_key(&self.active_kid)
            .map_err(|_| AuthorityError::ActiveKeyRemoved(self.active_kid.clone()))?;

        let header = Header {
            kid: Some(self.active_kid.clone()),
            ..Header::new(self.algorithm)
        };

        encode(&header, claims, &key).map_err(AuthorityError::Signing)
    }

    /// Validates `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, ValidationError> {
        self.validate_at(token, Utc::now())
    }

    /// Validates `token` as of `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, ValidationError> {
        let header = decode_header(token).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        let kid = header.kid.ok_or(ValidationError::MissingKeyId)?;

        let key = self
            .keys
            .public_key(&kid)
            .map_err(|_| ValidationError::UnknownKey(kid.clone()))?;

        let raw = match decode::<RawClaims>(token, &key, &self.validation) {
            Ok(data) => data.claims,
            Err(err) => return Err(self.classify(token, &key, now, err)),
        };

        if now > raw.exp {
            return Err(ValidationError::Expired);
        }
        if now < raw.nbf {
            return Err(ValidationError::NotYetValid);
        }
        if raw.exp <= raw.iat {
            return Err(ValidationError::Malformed(
                "token expires before it was issued".to_string(),
            ));
        }

        Claims::try_from(raw)
    }

    fn classify(
        &self,
        token: &str,
        key: &DecodingKey,
        now: DateTime<Utc>,
        err: jsonwebtoken::errors::Error,
    ) -> ValidationError {
        match err.kind() {
            ErrorKind::InvalidSignature => {
                if self.expired_unverified(token, key, now) {
                    ValidationError::Expired
                } else {
                    debug!(error = %err, "token signature mismatch");
                    ValidationError::SignatureMismatch
                }
            }
            ErrorKind::ExpiredSignature => ValidationError::Expired,
            ErrorKind::ImmatureSignature => ValidationError::NotYetValid,
            _ => ValidationError::Malformed(err.to_string()),
        }
    }

    /// Reads `exp` without trusting the signature.
    fn expired_unverified(&self, token: &str, key: &DecodingKey, now: DateTime<Utc>) -> bool {
        #[derive(Deserialize)]
        struct Expiry {
            exp: i64,
        }

        let mut peek = self.validation.clone();
        peek.insecure_disable_signature_validation();

        decode::<Expiry>(token, key, &peek)
            .map(|data| now.timestamp() > data.claims.exp)
            .unwrap_or(false)
    }
}
