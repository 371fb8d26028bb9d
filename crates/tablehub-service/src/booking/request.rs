//! Validated booking request types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use tablehub_core::error::AppError;
use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BranchId, DinerId, TableId};
use tablehub_entity::booking::Occasion;

/// A guest's request to book a table.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    /// Branch to book at.
    pub branch_id: BranchId,
    /// Requested table.
    pub table_id: TableId,
    /// Registered diner, if the guest has an account.
    pub user_id: Option<DinerId>,
    /// Guest display name.
    #[validate(length(min = 1, max = 100))]
    pub guest_name: String,
    /// Guest contact email.
    #[validate(email)]
    pub guest_email: String,
    /// Guest contact phone.
    #[validate(length(max = 30))]
    pub guest_phone: Option<String>,
    /// Number of guests.
    #[validate(range(min = 1, max = 100))]
    pub party_size: i32,
    /// Reservation date.
    pub booking_date: NaiveDate,
    /// Reservation start time.
    pub booking_time: NaiveTime,
    /// Reservation length in minutes; the configured default applies when
    /// omitted.
    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: Option<i32>,
    /// Occasion, if any.
    #[serde(default)]
    pub occasion: Occasion,
    /// Free-form guest requests.
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
    /// Coupon code to redeem, applied silently when valid.
    pub coupon_code: Option<String>,
}

impl BookingRequest {
    /// Runs field validation, mapping failures to `InvalidInput`.
    pub fn validated(&self) -> AppResult<()> {
        self.validate()
            .map_err(|e| AppError::invalid_input(e.to_string()))
    }
}

/// Fields a guest may change on an existing booking. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookingUpdate {
    /// Move the booking to a different table.
    pub table_id: Option<TableId>,
    /// Move the booking to a different date.
    pub booking_date: Option<NaiveDate>,
    /// Move the booking to a different start time.
    pub booking_time: Option<NaiveTime>,
    /// Change the reservation length.
    #[validate(range(min = 15, max = 480))]
    pub duration_minutes: Option<i32>,
    /// Change the party size.
    #[validate(range(min = 1, max = 100))]
    pub party_size: Option<i32>,
    /// Replace the special requests.
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
    /// Change the occasion.
    pub occasion: Option<Occasion>,
}

impl BookingUpdate {
    /// Runs field validation, mapping failures to `InvalidInput`.
    pub fn validated(&self) -> AppResult<()> {
        self.validate()
            .map_err(|e| AppError::invalid_input(e.to_string()))
    }

    /// Whether this update moves the booking in space or time, requiring
    /// an availability re-check.
    pub fn moves_booking(&self) -> bool {
        self.table_id.is_some()
            || self.booking_date.is_some()
            || self.booking_time.is_some()
            || self.duration_minutes.is_some()
    }
}
