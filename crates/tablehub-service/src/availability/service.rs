//! Availability computation over tables, time slots, and bookings.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};

use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BookingId, BranchId, TableId};
use tablehub_database::ReservationStore;
use tablehub_entity::table::{Table, TableLocation};
use tablehub_entity::timeslot::TimeSlot;

/// Fixed probe duration used when listing slots and tables. Admission may
/// still book a different duration; the probe just answers "could a
/// standard reservation start here".
const PROBE_DURATION_MINUTES: i32 = 90;

/// Answers availability questions without ever mutating state.
///
/// Every answer reflects a consistent read of the store at call time; a
/// positive answer is advisory and is re-checked by the admission
/// controller at commit time. Data-access failures propagate as errors,
/// never as "available".
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    store: Arc<dyn ReservationStore>,
}

impl AvailabilityService {
    /// Creates a new availability service.
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Lists the active time slots of a branch on `date` in which at least
    /// one capacity-eligible table could host a standard-length
    /// reservation starting at the slot's start time.
    ///
    /// Returns empty when no table fits the party at all, without probing
    /// any slot.
    pub async fn list_available_time_slots(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        party_size: i32,
    ) -> AppResult<Vec<TimeSlot>> {
        let tables = self
            .store
            .capacity_eligible_tables(branch_id, party_size, None)
            .await?;
        if tables.is_empty() {
            return Ok(Vec::new());
        }

        let slots = self.store.active_time_slots(branch_id, date).await?;
        let mut available = Vec::with_capacity(slots.len());
        for slot in slots {
            if self
                .any_table_free(&tables, date, slot.start_time, PROBE_DURATION_MINUTES)
                .await?
            {
                available.push(slot);
            }
        }
        Ok(available)
    }

    /// Lists the capacity-eligible tables of a branch free for a
    /// standard-length reservation at `date`/`time`, optionally filtered
    /// by location.
    pub async fn list_available_tables(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
        party_size: i32,
        location: Option<TableLocation>,
    ) -> AppResult<Vec<Table>> {
        let tables = self
            .store
            .capacity_eligible_tables(branch_id, party_size, location)
            .await?;

        let mut free = Vec::with_capacity(tables.len());
        for table in tables {
            if self
                .is_table_available(table.id, date, time, PROBE_DURATION_MINUTES, None)
                .await?
            {
                free.push(table);
            }
        }
        Ok(free)
    }

    /// Whether a table is free for `[time, time + duration)` on `date`.
    ///
    /// Half-open interval semantics: a booking ending exactly at `time`
    /// does not conflict. Cancelled bookings never block. `exclude` skips
    /// one booking id, used when re-checking a booking being modified.
    pub async fn is_table_available(
        &self,
        table_id: TableId,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i32,
        exclude: Option<BookingId>,
    ) -> AppResult<bool> {
        let start = date.and_time(time);
        let end = start + Duration::minutes(i64::from(duration_minutes));

        let bookings = self
            .store
            .blocking_bookings_for_table(table_id, date, exclude)
            .await?;
        Ok(!bookings.iter().any(|b| b.overlaps(start, end)))
    }

    /// Counts the non-cancelled bookings at an exact branch/date/time
    /// triple. Reporting only, never an admission gate.
    pub async fn count_bookings_for_slot(
        &self,
        branch_id: BranchId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<i64> {
        self.store
            .count_bookings_for_slot(branch_id, date, time)
            .await
    }

    /// Maps every date in the inclusive range to the number of available
    /// time slots for `party_size` on that date.
    pub async fn availability_calendar(
        &self,
        branch_id: BranchId,
        from: NaiveDate,
        to: NaiveDate,
        party_size: i32,
    ) -> AppResult<BTreeMap<NaiveDate, usize>> {
        let mut calendar = BTreeMap::new();
        let mut date = from;
        while date <= to {
            let slots = self
                .list_available_time_slots(branch_id, date, party_size)
                .await?;
            calendar.insert(date, slots.len());
            date += Duration::days(1);
        }
        Ok(calendar)
    }

    /// Whether any of `tables` is free at `date`/`time`, checking in
    /// stable order and stopping at the first free one.
    async fn any_table_free(
        &self,
        tables: &[Table],
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i32,
    ) -> AppResult<bool> {
        for table in tables {
            if self
                .is_table_available(table.id, date, time, duration_minutes, None)
                .await?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
