//! Booking repository implementation.
//!
//! Booking writes run against a schema that carries a gist exclusion
//! constraint over `(table_id, booking_date, reservation interval)` for
//! non-cancelled rows, so a lost race between two concurrent admissions
//! surfaces here as a constraint violation rather than a double booking.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BookingId, BranchId, DinerId, TableId};
use tablehub_entity::booking::{Booking, BookingStatus, NewBooking};

/// Name of the exclusion constraint enforcing the per-table overlap
/// invariant (see `migrations/0002_create_bookings.sql`).
const OVERLAP_CONSTRAINT: &str = "bookings_no_overlap";

/// Repository for booking reads and the guarded admission writes.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// Find a booking by its external reference.
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_reference = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find booking by reference", e)
            })
    }

    /// List the non-cancelled bookings holding a table on a date,
    /// optionally excluding one booking (used when re-checking
    /// availability for a booking being modified).
    pub async fn find_blocking_for_table(
        &self,
        table_id: TableId,
        date: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        match exclude {
            Some(excluded) => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE table_id = $1 AND booking_date = $2 \
                 AND status <> 'cancelled' AND id <> $3",
            )
            .bind(table_id)
            .bind(date)
            .bind(excluded)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE table_id = $1 AND booking_date = $2 \
                 AND status <> 'cancelled'",
            )
            .bind(table_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list table bookings", e)
        })
    }

    /// Count non-cancelled bookings at an exact branch/date/time triple.
    pub async fn count_for_slot(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE branch_id = $1 AND booking_date = $2 \
             AND booking_time = $3 AND status <> 'cancelled'",
        )
        .bind(branch_id)
        .bind(date)
        .bind(time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count bookings", e))
    }

    /// List a branch's bookings, optionally filtered by date and status,
    /// newest date first then by start time.
    pub async fn find_by_branch(
        &self,
        branch_id: BranchId,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let mut sql = String::from("SELECT * FROM bookings WHERE branch_id = $1");
        if date.is_some() {
            sql.push_str(" AND booking_date = $2");
        }
        if status.is_some() {
            sql.push_str(if date.is_some() {
                " AND status = $3"
            } else {
                " AND status = $2"
            });
        }
        sql.push_str(" ORDER BY booking_date DESC, booking_time ASC");

        let mut query = sqlx::query_as::<_, Booking>(&sql).bind(branch_id);
        if let Some(d) = date {
            query = query.bind(d);
        }
        if let Some(s) = status {
            query = query.bind(s);
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list branch bookings", e)
        })
    }

    /// List a diner's bookings, newest date first then by start time.
    pub async fn find_by_user(&self, user_id: DinerId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 \
             ORDER BY booking_date DESC, booking_time ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user bookings", e)
        })
    }

    /// Insert a new booking and redeem its coupon in one transaction.
    ///
    /// The booking starts in `pending` status. If the exclusion constraint
    /// rejects the row, a concurrent admission won the race for this table
    /// and interval.
    pub async fn create(&self, new: &NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (booking_reference, branch_id, table_id, user_id, \
             guest_name, guest_email, guest_phone, party_size, booking_date, booking_time, \
             duration_minutes, occasion, special_requests, deposit_amount, payment_intent_id, \
             coupon_id, discount_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING *",
        )
        .bind(&new.booking_reference)
        .bind(new.branch_id)
        .bind(new.table_id)
        .bind(new.user_id)
        .bind(&new.guest_name)
        .bind(&new.guest_email)
        .bind(&new.guest_phone)
        .bind(new.party_size)
        .bind(new.booking_date)
        .bind(new.booking_time)
        .bind(new.duration_minutes)
        .bind(new.occasion)
        .bind(&new.special_requests)
        .bind(new.deposit_amount)
        .bind(&new.payment_intent_id)
        .bind(new.coupon_id)
        .bind(new.discount_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if let Some(coupon_id) = new.coupon_id {
            sqlx::query("UPDATE coupons SET usage_count = usage_count + 1 WHERE id = $1")
                .bind(coupon_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to redeem coupon", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit booking", e)
        })?;

        Ok(booking)
    }

    /// Persist all mutable fields of an existing booking.
    ///
    /// Moving a booking onto an occupied interval trips the same exclusion
    /// constraint as creation.
    pub async fn update(&self, booking: &Booking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET table_id = $2, guest_name = $3, guest_email = $4, \
             guest_phone = $5, party_size = $6, booking_date = $7, booking_time = $8, \
             duration_minutes = $9, status = $10, occasion = $11, special_requests = $12, \
             qr_code_url = $13, deposit_amount = $14, deposit_paid = $15, \
             payment_intent_id = $16, coupon_id = $17, discount_amount = $18, \
             is_verified = $19, updated_at = $20, cancelled_at = $21, \
             cancellation_reason = $22 \
             WHERE id = $1 RETURNING *",
        )
        .bind(booking.id)
        .bind(booking.table_id)
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(&booking.guest_phone)
        .bind(booking.party_size)
        .bind(booking.booking_date)
        .bind(booking.booking_time)
        .bind(booking.duration_minutes)
        .bind(booking.status)
        .bind(booking.occasion)
        .bind(&booking.special_requests)
        .bind(&booking.qr_code_url)
        .bind(booking.deposit_amount)
        .bind(booking.deposit_paid)
        .bind(&booking.payment_intent_id)
        .bind(booking.coupon_id)
        .bind(booking.discount_amount)
        .bind(booking.is_verified)
        .bind(booking.updated_at)
        .bind(booking.cancelled_at)
        .bind(&booking.cancellation_reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking.id)))
    }
}

/// Translate storage-level write failures into the admission error taxonomy.
fn map_write_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(OVERLAP_CONSTRAINT) => {
            AppError::concurrency_conflict(
                "The selected time slot is no longer available. Please try again.",
            )
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to write booking", e),
    }
}
