//! Time slot repository implementation.

use sqlx::PgPool;

use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_core::types::id::BranchId;
use tablehub_entity::timeslot::TimeSlot;

/// Repository for time slot queries.
#[derive(Debug, Clone)]
pub struct TimeSlotRepository {
    pool: PgPool,
}

impl TimeSlotRepository {
    /// Create a new time slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a branch's active slots applicable on the given day of week
    /// (0 = Sunday), in ascending start-time order. Slots without a
    /// day-of-week restriction always apply.
    pub async fn find_active_for_day(
        &self,
        branch_id: BranchId,
        day_of_week: i16,
    ) -> AppResult<Vec<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE branch_id = $1 AND is_active = TRUE \
             AND (day_of_week IS NULL OR day_of_week = $2) \
             ORDER BY start_time ASC",
        )
        .bind(branch_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list time slots", e))
    }
}
