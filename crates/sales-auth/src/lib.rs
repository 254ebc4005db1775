//! # Sales Auth
//!
//! Token-based authentication for the Sales API.
//!
//! This crate provides:
//!
//! - [`role`]: the closed vocabulary of capability tags
//! - [`claims`]: the authenticated principal carried through a request
//! - [`keystore`]: RSA key pairs indexed by key id, safe for concurrent
//!   lookups and rotation
//! - [`authority`]: issuing and validating signed tokens
//! - [`error`]: the failure types of each of the above
//!
//! # Rotation
//!
//! Exactly one key id is *active* and signs new tokens. Every key still in
//! the store verifies tokens, so rotating the active key does not invalidate
//! tokens issued under the previous one until that key is removed.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sales_auth::{Claims, KeyStore, Role, TokenAuthority};
//!
//! let keys = Arc::new(KeyStore::from_dir("zarf/keys")?);
//! let authority = TokenAuthority::new(keys, "54bb2165-71e1-41a6-af3e-7da4a0e1e2c1")?;
//!
//! let claims = Claims::new(user_id, [Role::User], "sales api", ttl, Utc::now());
//! let token = authority.issue(&claims)?;
//!
//! let verified = authority.validate(&token)?;
//! assert!(verified.authorized(&[Role::User]));
//! ```

pub mod authority;
pub mod claims;
pub mod error;
pub mod keystore;
pub mod role;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

// Re-export commonly used types at crate root
pub use authority::TokenAuthority;
pub use claims::Claims;
pub use error::{AuthorityError, KeyStoreError, ValidationError};
pub use keystore::{KeyLookup, KeyStore, SigningKeyPair};
pub use role::Role;
