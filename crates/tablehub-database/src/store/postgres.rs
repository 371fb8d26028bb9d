//! PostgreSQL-backed reservation store.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::PgPool;

use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BookingId, BranchId, DinerId, TableId};
use tablehub_entity::booking::{Booking, BookingStatus, NewBooking};
use tablehub_entity::branch::Branch;
use tablehub_entity::coupon::Coupon;
use tablehub_entity::table::{Table, TableLocation};
use tablehub_entity::timeslot::TimeSlot;

use crate::repositories::{
    BookingRepository, BranchRepository, CouponRepository, TableRepository, TimeSlotRepository,
};

use super::ReservationStore;

/// Production [`ReservationStore`] composed from the per-entity
/// repositories. The overlap invariant is enforced by the schema's
/// exclusion constraint, so no explicit locking happens here.
#[derive(Debug, Clone)]
pub struct PgReservationStore {
    branches: BranchRepository,
    tables: TableRepository,
    slots: TimeSlotRepository,
    bookings: BookingRepository,
    coupons: CouponRepository,
}

impl PgReservationStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            branches: BranchRepository::new(pool.clone()),
            tables: TableRepository::new(pool.clone()),
            slots: TimeSlotRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            coupons: CouponRepository::new(pool),
        }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn find_branch(&self, branch_id: BranchId) -> AppResult<Option<Branch>> {
        self.branches.find_by_id(branch_id).await
    }

    async fn find_active_table_with_branch(
        &self,
        table_id: TableId,
    ) -> AppResult<Option<(Table, Branch)>> {
        let Some(table) = self.tables.find_active_by_id(table_id).await? else {
            return Ok(None);
        };
        let Some(branch) = self.branches.find_by_id(table.branch_id).await? else {
            return Ok(None);
        };
        Ok(Some((table, branch)))
    }

    async fn capacity_eligible_tables(
        &self,
        branch_id: BranchId,
        party_size: i32,
        location: Option<TableLocation>,
    ) -> AppResult<Vec<Table>> {
        self.tables
            .find_capacity_eligible(branch_id, party_size, location)
            .await
    }

    async fn active_time_slots(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        let day_of_week = date.weekday().num_days_from_sunday() as i16;
        self.slots.find_active_for_day(branch_id, day_of_week).await
    }

    async fn blocking_bookings_for_table(
        &self,
        table_id: TableId,
        date: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        self.bookings
            .find_blocking_for_table(table_id, date, exclude)
            .await
    }

    async fn count_bookings_for_slot(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<i64> {
        self.bookings.count_for_slot(branch_id, date, time).await
    }

    async fn find_active_coupon(&self, code: &str) -> AppResult<Option<Coupon>> {
        self.coupons.find_active_by_code(code).await
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        self.bookings.find_by_id(id).await
    }

    async fn find_booking_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        self.bookings.find_by_reference(reference).await
    }

    async fn bookings_for_branch(
        &self,
        branch_id: BranchId,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        self.bookings.find_by_branch(branch_id, date, status).await
    }

    async fn bookings_for_user(&self, user_id: DinerId) -> AppResult<Vec<Booking>> {
        self.bookings.find_by_user(user_id).await
    }

    async fn insert_booking(&self, new: &NewBooking) -> AppResult<Booking> {
        self.bookings.create(new).await
    }

    async fn update_booking(&self, booking: &Booking) -> AppResult<Booking> {
        self.bookings.update(booking).await
    }
}
