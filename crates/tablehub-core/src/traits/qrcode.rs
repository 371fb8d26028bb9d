//! QR code artifact generation trait.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::result::AppResult;

/// Trait for generating a scannable check-in code for a booking.
///
/// The returned string is an opaque reference (typically a public URL
/// path). Generation happens after the booking has committed; a failure
/// here is logged by the caller and degrades to an empty reference, it
/// never fails the booking.
#[async_trait]
pub trait QrCodeGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a code artifact for the given booking details.
    async fn generate(
        &self,
        booking_reference: &str,
        guest_name: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<String>;
}
