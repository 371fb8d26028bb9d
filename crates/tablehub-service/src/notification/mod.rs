//! Booking notification seam.
//!
//! Delivery transports (email, SMS, push) live behind [`BookingNotifier`];
//! the admission controller only knows that notifications are
//! fire-and-forget. A failed notification is logged by the caller and
//! never affects the booking.

use async_trait::async_trait;
use tracing::info;

use tablehub_core::result::AppResult;
use tablehub_entity::booking::Booking;

/// Sends booking lifecycle notifications to the guest.
#[async_trait]
pub trait BookingNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Notify the guest that their booking was created.
    async fn send_booking_confirmation(&self, booking: &Booking) -> AppResult<()>;

    /// Notify the guest that their booking was cancelled.
    async fn send_booking_cancellation(&self, booking: &Booking) -> AppResult<()>;

    /// Notify the guest that their booking was modified.
    async fn send_booking_modification(&self, booking: &Booking) -> AppResult<()>;
}

/// Default notifier that records each notification in the log stream.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a new log notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn send_booking_confirmation(&self, booking: &Booking) -> AppResult<()> {
        info!(
            reference = %booking.booking_reference,
            email = %booking.guest_email,
            "Booking confirmation notification"
        );
        Ok(())
    }

    async fn send_booking_cancellation(&self, booking: &Booking) -> AppResult<()> {
        info!(
            reference = %booking.booking_reference,
            email = %booking.guest_email,
            "Booking cancellation notification"
        );
        Ok(())
    }

    async fn send_booking_modification(&self, booking: &Booking) -> AppResult<()> {
        info!(
            reference = %booking.booking_reference,
            email = %booking.guest_email,
            "Booking modification notification"
        );
        Ok(())
    }
}
