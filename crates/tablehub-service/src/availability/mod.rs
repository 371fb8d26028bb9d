//! Read-side availability engine.

mod service;

pub use service::AvailabilityService;
