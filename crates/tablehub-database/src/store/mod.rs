//! The reservation storage contract consumed by the service layer.
//!
//! Two implementations ship with TableHub: [`PgReservationStore`]
//! (PostgreSQL, production) and [`MemoryReservationStore`] (embedded,
//! used by demos and tests). Both guarantee the per-table overlap
//! invariant: Postgres through a gist exclusion constraint, the memory
//! store by checking and inserting under a single write lock.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BookingId, BranchId, DinerId, TableId};
use tablehub_entity::booking::{Booking, BookingStatus, NewBooking};
use tablehub_entity::branch::Branch;
use tablehub_entity::coupon::Coupon;
use tablehub_entity::table::{Table, TableLocation};
use tablehub_entity::timeslot::TimeSlot;

pub use memory::MemoryReservationStore;
pub use postgres::PgReservationStore;

/// Queryable, transactable access to tables, time slots, bookings, and
/// coupons.
///
/// All cross-entity fetches are explicit calls returning plain aggregates;
/// there are no lazy associations. Write operations uphold the overlap
/// invariant and surface a lost admission race as
/// [`ErrorKind::ConcurrencyConflict`](tablehub_core::error::ErrorKind::ConcurrencyConflict).
#[async_trait]
pub trait ReservationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a branch by ID.
    async fn find_branch(&self, branch_id: BranchId) -> AppResult<Option<Branch>>;

    /// Find an active table together with its owning branch.
    async fn find_active_table_with_branch(
        &self,
        table_id: TableId,
    ) -> AppResult<Option<(Table, Branch)>>;

    /// List a branch's active tables whose capacity range contains
    /// `party_size`, optionally filtered by location, in stable
    /// table-number order.
    async fn capacity_eligible_tables(
        &self,
        branch_id: BranchId,
        party_size: i32,
        location: Option<TableLocation>,
    ) -> AppResult<Vec<Table>>;

    /// List a branch's active time slots applicable on `date`, in
    /// ascending start-time order.
    async fn active_time_slots(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>>;

    /// List the non-cancelled bookings holding `table_id` on `date`,
    /// optionally excluding one booking id.
    async fn blocking_bookings_for_table(
        &self,
        table_id: TableId,
        date: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>>;

    /// Count non-cancelled bookings at an exact branch/date/time triple.
    async fn count_bookings_for_slot(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<i64>;

    /// Find an active coupon by code.
    async fn find_active_coupon(&self, code: &str) -> AppResult<Option<Coupon>>;

    /// Find a booking by ID.
    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Find a booking by its external reference.
    async fn find_booking_by_reference(&self, reference: &str) -> AppResult<Option<Booking>>;

    /// List a branch's bookings, optionally filtered by date and status.
    async fn bookings_for_branch(
        &self,
        branch_id: BranchId,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// List a diner's bookings.
    async fn bookings_for_user(&self, user_id: DinerId) -> AppResult<Vec<Booking>>;

    /// Atomically insert a pending booking and redeem its coupon.
    ///
    /// A concurrent admission that already holds an overlapping interval
    /// on the same table causes a `ConcurrencyConflict`.
    async fn insert_booking(&self, new: &NewBooking) -> AppResult<Booking>;

    /// Persist all mutable fields of an existing booking, upholding the
    /// overlap invariant when the booking moved.
    async fn update_booking(&self, booking: &Booking) -> AppResult<Booking>;
}
