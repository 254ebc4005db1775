//! # Sales API
//!
//! User management over HTTP, behind bearer-token authentication and
//! role-based authorization.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── sales-core/     # error taxonomy, validation, password hashing
//! ├── sales-auth/     # roles, claims, key store, token authority
//! ├── sales-config/   # environment configuration
//! └── sales-web/      # handler + middleware composition over axum
//! src/
//! ├── middleware/     # logger, errors, metrics, panics, timeout, auth
//! ├── modules/
//! │   ├── users/      # user CRUD and token issuance
//! │   ├── smoke/      # /v1/test, /v1/testauth
//! │   └── check/      # debug listener probes and counters
//! ├── metrics.rs      # process-wide counters + Prometheus recorder
//! ├── logging.rs      # tracing subscriber setup
//! ├── router.rs       # API and debug routers
//! └── server.rs       # startup and graceful shutdown
//! ```
//!
//! ## Request lifecycle
//!
//! Every API route runs through the same chain, outermost first:
//!
//! 1. **logger**: start/completion lines with the trace id
//! 2. **errors**: the only place an error becomes a response
//! 3. **metrics**: request and error counters
//! 4. **panics**: a panic below becomes a 500, never a crash
//! 5. **timeout**: bounds handler time
//! 6. per route: **authenticate**, then **authorize**
//!
//! A handler that returns a shutdown error gets a 500 like any other
//! failure, and the process begins a graceful shutdown.
//!
//! ## Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | GET | `/v1/test` | public |
//! | GET | `/v1/testauth` | ADMIN |
//! | GET | `/v1/users/token` | Basic credentials |
//! | GET | `/v1/users/{page}/{rows}` | ADMIN |
//! | GET | `/v1/users/{id}` | authenticated (own record unless ADMIN) |
//! | POST | `/v1/users` | ADMIN |
//! | PUT | `/v1/users/{id}` | authenticated (own record unless ADMIN) |
//! | DELETE | `/v1/users/{id}` | authenticated (own record unless ADMIN) |
//!
//! The debug listener serves `/debug/liveness`, `/debug/readiness`,
//! `/debug/vars` and `/metrics`.

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod server;
pub mod state;
