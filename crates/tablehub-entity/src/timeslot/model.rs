//! Time slot entity model.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::{BranchId, TimeSlotId};

use super::meal::MealType;

/// A named bookable interval (e.g. 18:00-18:30) scoped to a branch,
/// optionally restricted to one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: TimeSlotId,
    /// Owning branch.
    pub branch_id: BranchId,
    /// Meal service this slot belongs to.
    pub meal: MealType,
    /// Slot start time.
    pub start_time: NaiveTime,
    /// Slot end time.
    pub end_time: NaiveTime,
    /// Day of week restriction (0 = Sunday, 6 = Saturday); `None` = all days.
    pub day_of_week: Option<i16>,
    /// Advisory per-slot booking cap. Admission is gated per table, never
    /// by this value.
    pub max_bookings: i32,
    /// Whether the slot is currently offered.
    pub is_active: bool,
    /// When the slot was created.
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Whether this slot is offered on `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.day_of_week {
            None => true,
            Some(dow) => i16::try_from(date.weekday().num_days_from_sunday()).ok() == Some(dow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day_of_week: Option<i16>) -> TimeSlot {
        TimeSlot {
            id: TimeSlotId::new(),
            branch_id: BranchId::new(),
            meal: MealType::Dinner,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            day_of_week,
            max_bookings: 10,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_applies_on_any_day_when_unrestricted() {
        let s = slot(None);
        // 2025-06-01 is a Sunday, 2025-06-02 a Monday.
        assert!(s.applies_on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(s.applies_on(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()));
    }

    #[test]
    fn test_applies_on_matching_weekday_only() {
        let sunday_only = slot(Some(0));
        assert!(sunday_only.applies_on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(!sunday_only.applies_on(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()));
    }
}
