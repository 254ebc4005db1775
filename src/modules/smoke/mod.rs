//! Trivial routes for checking the API listener and the auth chain.

pub mod controller;
pub mod router;
