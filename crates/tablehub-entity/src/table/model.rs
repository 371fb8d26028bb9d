//! Table entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::{BranchId, TableId};

use super::location::TableLocation;

/// A physical table belonging to one branch.
///
/// Tables are soft-disabled via `is_active`; they are never hard-deleted
/// while non-cancelled bookings reference them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Table {
    /// Unique table identifier.
    pub id: TableId,
    /// Owning branch.
    pub branch_id: BranchId,
    /// Human-facing table number (e.g. "T01").
    pub table_number: String,
    /// Smallest party this table accepts (inclusive).
    pub min_capacity: i32,
    /// Largest party this table accepts (inclusive).
    pub max_capacity: i32,
    /// Where the table is located.
    pub location: TableLocation,
    /// Optional staff-facing description.
    pub description: Option<String>,
    /// Whether the table is currently bookable.
    pub is_active: bool,
    /// When the table was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Table {
    /// Whether this table can seat a party of `party_size`.
    pub fn fits_party(&self, party_size: i32) -> bool {
        self.min_capacity <= party_size && party_size <= self.max_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(min: i32, max: i32) -> Table {
        Table {
            id: TableId::new(),
            branch_id: BranchId::new(),
            table_number: "T01".into(),
            min_capacity: min,
            max_capacity: max,
            location: TableLocation::Standard,
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_fits_party_inclusive_bounds() {
        let t = table(2, 4);
        assert!(!t.fits_party(1));
        assert!(t.fits_party(2));
        assert!(t.fits_party(4));
        assert!(!t.fits_party(5));
    }
}
