//! Business logic services for TableHub.
//!
//! Two services make up the core: [`AvailabilityService`], the read-side
//! engine answering "what can be booked", and [`BookingService`], the
//! admission controller guarding every booking write. Supporting pieces
//! are the Stripe payment gateway, the notification seam, and the QR
//! check-in artifact generator.

pub mod availability;
pub mod booking;
pub mod notification;
pub mod payment;
pub mod qrcode;

pub use availability::AvailabilityService;
pub use booking::{BookingConfirmation, BookingRequest, BookingService, BookingUpdate};
pub use notification::{BookingNotifier, LogNotifier};
pub use payment::StripeGateway;
pub use qrcode::PngQrGenerator;
