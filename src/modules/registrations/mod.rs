pub mod controller;
pub mod router;
pub mod service;
pub mod store;

pub use router::init_registrations_router;
