//! Booking entity model.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::{BookingId, BranchId, CouponId, DinerId, TableId};

use super::occasion::Occasion;
use super::status::BookingStatus;

/// A reservation record.
///
/// Invariant: for a given table and booking date, no two bookings whose
/// status blocks the table may have overlapping half-open
/// `[start, start + duration)` intervals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// External, URL-safe reference handed to the guest.
    pub booking_reference: String,
    /// Branch the booking is at.
    pub branch_id: BranchId,
    /// Table the booking holds.
    pub table_id: TableId,
    /// Registered diner, if the guest has an account.
    pub user_id: Option<DinerId>,
    /// Guest display name.
    pub guest_name: String,
    /// Guest contact email.
    pub guest_email: String,
    /// Guest contact phone.
    pub guest_phone: Option<String>,
    /// Number of guests.
    pub party_size: i32,
    /// Reservation date.
    pub booking_date: NaiveDate,
    /// Reservation start time.
    pub booking_time: NaiveTime,
    /// Reservation length in minutes.
    pub duration_minutes: i32,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Occasion, if any.
    pub occasion: Occasion,
    /// Free-form guest requests.
    pub special_requests: Option<String>,
    /// Public URL of the generated check-in QR code.
    pub qr_code_url: Option<String>,
    /// Deposit charged for this booking (net of discount).
    pub deposit_amount: Option<Decimal>,
    /// Whether the deposit has been paid.
    pub deposit_paid: bool,
    /// Gateway payment intent backing the deposit.
    pub payment_intent_id: Option<String>,
    /// Redeemed coupon, if any.
    pub coupon_id: Option<CouponId>,
    /// Discount applied via the coupon.
    pub discount_amount: Option<Decimal>,
    /// Set when staff confirm the booking.
    pub is_verified: bool,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Reason supplied at cancellation.
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// Combined start instant of the reservation (date + time, branch-local).
    pub fn starts_at(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.booking_time)
    }

    /// End instant of the half-open reservation interval.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether this booking's interval strictly overlaps
    /// `[candidate_start, candidate_end)`.
    ///
    /// Half-open semantics: a booking ending exactly when the candidate
    /// starts does not conflict.
    pub fn overlaps(&self, candidate_start: NaiveDateTime, candidate_end: NaiveDateTime) -> bool {
        candidate_start < self.ends_at() && candidate_end > self.starts_at()
    }
}

/// Data required to create a new booking (admission-controller internal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// Generated external reference.
    pub booking_reference: String,
    /// Branch the booking is at.
    pub branch_id: BranchId,
    /// Table the booking holds.
    pub table_id: TableId,
    /// Registered diner, if any.
    pub user_id: Option<DinerId>,
    /// Guest display name.
    pub guest_name: String,
    /// Guest contact email.
    pub guest_email: String,
    /// Guest contact phone.
    pub guest_phone: Option<String>,
    /// Number of guests.
    pub party_size: i32,
    /// Reservation date.
    pub booking_date: NaiveDate,
    /// Reservation start time.
    pub booking_time: NaiveTime,
    /// Reservation length in minutes.
    pub duration_minutes: i32,
    /// Occasion, if any.
    pub occasion: Occasion,
    /// Free-form guest requests.
    pub special_requests: Option<String>,
    /// Deposit charged (net of discount), when the branch requires one.
    pub deposit_amount: Option<Decimal>,
    /// Gateway payment intent backing the deposit.
    pub payment_intent_id: Option<String>,
    /// Coupon to redeem atomically with the insert.
    pub coupon_id: Option<CouponId>,
    /// Discount applied via the coupon.
    pub discount_amount: Option<Decimal>,
}
