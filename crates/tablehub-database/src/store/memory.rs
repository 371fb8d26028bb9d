//! Embedded in-memory reservation store.
//!
//! Used by demos and the integration test suite. Admission writes take the
//! single write lock for the whole check-then-insert, which serializes
//! concurrent attempts and upholds the same overlap invariant the
//! PostgreSQL schema enforces with its exclusion constraint.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;

use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BookingId, BranchId, CouponId, DinerId, TableId, TimeSlotId};
use tablehub_core::AppError;
use tablehub_entity::booking::{Booking, BookingStatus, NewBooking};
use tablehub_entity::branch::Branch;
use tablehub_entity::coupon::Coupon;
use tablehub_entity::table::{Table, TableLocation};
use tablehub_entity::timeslot::TimeSlot;

use super::ReservationStore;

#[derive(Debug, Default)]
struct Inner {
    branches: HashMap<BranchId, Branch>,
    tables: HashMap<TableId, Table>,
    slots: HashMap<TimeSlotId, TimeSlot>,
    coupons: HashMap<CouponId, Coupon>,
    bookings: HashMap<BookingId, Booking>,
}

/// In-memory [`ReservationStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryReservationStore {
    inner: RwLock<Inner>,
}

impl MemoryReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a branch.
    pub async fn add_branch(&self, branch: Branch) {
        self.inner.write().await.branches.insert(branch.id, branch);
    }

    /// Seed a table.
    pub async fn add_table(&self, table: Table) {
        self.inner.write().await.tables.insert(table.id, table);
    }

    /// Seed a time slot.
    pub async fn add_time_slot(&self, slot: TimeSlot) {
        self.inner.write().await.slots.insert(slot.id, slot);
    }

    /// Seed a coupon.
    pub async fn add_coupon(&self, coupon: Coupon) {
        self.inner.write().await.coupons.insert(coupon.id, coupon);
    }

    /// Snapshot every stored booking (test assertions).
    pub async fn all_bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.values().cloned().collect()
    }
}

/// Whether `new` overlaps any blocking booking on the same table and date.
fn conflicts(inner: &Inner, new: &NewBooking, exclude: Option<BookingId>) -> bool {
    let start = new.booking_date.and_time(new.booking_time);
    let end = start + chrono::Duration::minutes(i64::from(new.duration_minutes));
    inner.bookings.values().any(|b| {
        Some(b.id) != exclude
            && b.table_id == new.table_id
            && b.booking_date == new.booking_date
            && b.status.blocks_table()
            && b.overlaps(start, end)
    })
}

fn sort_bookings(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| {
        b.booking_date
            .cmp(&a.booking_date)
            .then(a.booking_time.cmp(&b.booking_time))
    });
    bookings
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn find_branch(&self, branch_id: BranchId) -> AppResult<Option<Branch>> {
        Ok(self.inner.read().await.branches.get(&branch_id).cloned())
    }

    async fn find_active_table_with_branch(
        &self,
        table_id: TableId,
    ) -> AppResult<Option<(Table, Branch)>> {
        let inner = self.inner.read().await;
        let Some(table) = inner.tables.get(&table_id).filter(|t| t.is_active) else {
            return Ok(None);
        };
        Ok(inner
            .branches
            .get(&table.branch_id)
            .map(|branch| (table.clone(), branch.clone())))
    }

    async fn capacity_eligible_tables(
        &self,
        branch_id: BranchId,
        party_size: i32,
        location: Option<TableLocation>,
    ) -> AppResult<Vec<Table>> {
        let inner = self.inner.read().await;
        let mut tables: Vec<Table> = inner
            .tables
            .values()
            .filter(|t| {
                t.branch_id == branch_id
                    && t.is_active
                    && t.fits_party(party_size)
                    && location.is_none_or(|loc| t.location == loc)
            })
            .cloned()
            .collect();
        tables.sort_by(|a, b| a.table_number.cmp(&b.table_number).then(a.id.cmp(&b.id)));
        Ok(tables)
    }

    async fn active_time_slots(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        let inner = self.inner.read().await;
        let mut slots: Vec<TimeSlot> = inner
            .slots
            .values()
            .filter(|s| s.branch_id == branch_id && s.is_active && s.applies_on(date))
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    async fn blocking_bookings_for_table(
        &self,
        table_id: TableId,
        date: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                b.table_id == table_id
                    && b.booking_date == date
                    && b.status.blocks_table()
                    && Some(b.id) != exclude
            })
            .cloned()
            .collect())
    }

    async fn count_bookings_for_slot(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| {
                b.branch_id == branch_id
                    && b.booking_date == date
                    && b.booking_time == time
                    && b.status.blocks_table()
            })
            .count() as i64)
    }

    async fn find_active_coupon(&self, code: &str) -> AppResult<Option<Coupon>> {
        let inner = self.inner.read().await;
        Ok(inner
            .coupons
            .values()
            .find(|c| c.code == code && c.is_active)
            .cloned())
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn find_booking_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .find(|b| b.booking_reference == reference)
            .cloned())
    }

    async fn bookings_for_branch(
        &self,
        branch_id: BranchId,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| {
                b.branch_id == branch_id
                    && date.is_none_or(|d| b.booking_date == d)
                    && status.is_none_or(|s| b.status == s)
            })
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn bookings_for_user(&self, user_id: DinerId) -> AppResult<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.user_id == Some(user_id))
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn insert_booking(&self, new: &NewBooking) -> AppResult<Booking> {
        // Check and insert under one write lock: this is the whole
        // serialization story for the embedded store.
        let mut inner = self.inner.write().await;

        if conflicts(&inner, new, None) {
            return Err(AppError::concurrency_conflict(
                "The selected time slot is no longer available. Please try again.",
            ));
        }

        let booking = Booking {
            id: BookingId::new(),
            booking_reference: new.booking_reference.clone(),
            branch_id: new.branch_id,
            table_id: new.table_id,
            user_id: new.user_id,
            guest_name: new.guest_name.clone(),
            guest_email: new.guest_email.clone(),
            guest_phone: new.guest_phone.clone(),
            party_size: new.party_size,
            booking_date: new.booking_date,
            booking_time: new.booking_time,
            duration_minutes: new.duration_minutes,
            status: BookingStatus::Pending,
            occasion: new.occasion,
            special_requests: new.special_requests.clone(),
            qr_code_url: None,
            deposit_amount: new.deposit_amount,
            deposit_paid: false,
            payment_intent_id: new.payment_intent_id.clone(),
            coupon_id: new.coupon_id,
            discount_amount: new.discount_amount,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        };

        if let Some(coupon_id) = new.coupon_id {
            if let Some(coupon) = inner.coupons.get_mut(&coupon_id) {
                coupon.usage_count += 1;
            }
        }

        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, booking: &Booking) -> AppResult<Booking> {
        let mut inner = self.inner.write().await;

        if !inner.bookings.contains_key(&booking.id) {
            return Err(AppError::not_found(format!(
                "Booking {} not found",
                booking.id
            )));
        }

        if booking.status.blocks_table() {
            let probe = NewBooking {
                booking_reference: booking.booking_reference.clone(),
                branch_id: booking.branch_id,
                table_id: booking.table_id,
                user_id: booking.user_id,
                guest_name: booking.guest_name.clone(),
                guest_email: booking.guest_email.clone(),
                guest_phone: booking.guest_phone.clone(),
                party_size: booking.party_size,
                booking_date: booking.booking_date,
                booking_time: booking.booking_time,
                duration_minutes: booking.duration_minutes,
                occasion: booking.occasion,
                special_requests: booking.special_requests.clone(),
                deposit_amount: booking.deposit_amount,
                payment_intent_id: booking.payment_intent_id.clone(),
                coupon_id: booking.coupon_id,
                discount_amount: booking.discount_amount,
            };
            if conflicts(&inner, &probe, Some(booking.id)) {
                return Err(AppError::concurrency_conflict(
                    "The selected time slot is no longer available. Please try again.",
                ));
            }
        }

        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }
}
