//! Error types for key management, token issuance and token validation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures looking up or loading signing keys.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key id {0:?} not found")]
    NotFound(String),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing key {kid:?}: {source}")]
    InvalidKey {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("private key {0:?} has no matching public key file")]
    MissingPublicKey(String),

    #[error("key file {path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Failures constructing an authority or signing with it.
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("active key {kid:?} is not in the key store")]
    ActiveKeyMissing {
        kid: String,
        #[source]
        source: KeyStoreError,
    },

    #[error("unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("active key {0:?} was removed from the key store")]
    ActiveKeyRemoved(String),

    #[error("token would expire at {expires_at} before it is issued at {issued_at}")]
    InvalidLifetime {
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },

    #[error("signing token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Why a token was rejected. None of these are shown to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token header has no key id")]
    MissingKeyId,

    #[error("token signed with unknown key {0:?}")]
    UnknownKey(String),

    #[error("token signature does not match")]
    SignatureMismatch,

    #[error("token is expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token carries unknown role {0:?}")]
    UnknownRole(String),
}
