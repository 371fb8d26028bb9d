//! Payment gateway implementations.

mod stripe;

pub use stripe::StripeGateway;
