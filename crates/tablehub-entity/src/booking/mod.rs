//! Booking entity: the reservation record and its lifecycle.

pub mod model;
pub mod occasion;
pub mod status;

pub use model::{Booking, NewBooking};
pub use occasion::Occasion;
pub use status::BookingStatus;
