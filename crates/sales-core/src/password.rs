//! Password hashing with bcrypt.

use anyhow::Context;
use bcrypt::{DEFAULT_COST, hash, verify};

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    hash(password, DEFAULT_COST).context("generating password hash")
}

/// Returns `Ok(false)` on a mismatch; errors only when `hashed` is not a bcrypt hash.
pub fn verify_password(password: &str, hashed: &str) -> anyhow::Result<bool> {
    verify(password, hashed).context("verifying password hash")
}
