//! Debug listener endpoints: probes and counters.

pub mod controller;
pub mod router;
