//! Branch entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::{BranchId, RestaurantId};

/// A restaurant branch. Owns the tables, time slots, and booking policy
/// (cancellation window, deposit requirements) applied during admission.
///
/// Policy fields are read once at decision time; no computation mutates
/// them mid-flight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    /// Unique branch identifier.
    pub id: BranchId,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Branch display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Total seating capacity across all tables.
    pub capacity: i32,
    /// Granularity of bookable start times, in minutes.
    pub booking_interval_minutes: i32,
    /// How many hours before the reservation a booking may still be
    /// cancelled or modified.
    pub cancellation_policy_hours: i32,
    /// Minimum charge per booking, used as the base for percentage coupons.
    pub minimum_charge: Option<Decimal>,
    /// Whether a deposit is collected at booking time.
    pub require_deposit: bool,
    /// Deposit amount when `require_deposit` is set.
    pub deposit_amount: Option<Decimal>,
    /// Whether the branch currently accepts bookings.
    pub is_active: bool,
    /// When the branch was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
}
