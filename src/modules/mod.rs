//! Feature modules. Each has a `controller` with the handlers and a
//! `router` that registers them.

pub mod check;
pub mod smoke;
pub mod users;
