//! # Sales Core
//!
//! Foundational types shared by every layer of the Sales API:
//!
//! - [`errors`]: the error taxonomy (field validation, request errors with an
//!   explicit status, the shutdown sentinel) and the translation of any error
//!   into a wire response
//! - [`validate`]: struct validation producing [`errors::FieldErrors`], plus id helpers
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use sales_core::errors::{RequestError, cause};
//!
//! let err: anyhow::Error = RequestError::not_found(anyhow::anyhow!("user not found")).into();
//! let err = err.context("loading user");
//!
//! // Classification survives the added context.
//! assert!(cause::<RequestError>(&err).is_some());
//! ```

pub mod errors;
pub mod password;
pub mod validate;

// Re-export commonly used types at crate root
pub use errors::{ErrorResponse, FieldError, FieldErrors, RequestError, ShutdownError, cause};
pub use password::{hash_password, verify_password};
