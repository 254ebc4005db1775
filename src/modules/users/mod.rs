pub mod controller;
pub mod memory;
pub mod model;
pub mod router;
pub mod store;
