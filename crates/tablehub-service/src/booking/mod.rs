//! Booking admission controller and its request/response types.

mod reference;
mod request;
mod service;

pub use reference::generate_booking_reference;
pub use request::{BookingRequest, BookingUpdate};
pub use service::{BookingConfirmation, BookingService};
