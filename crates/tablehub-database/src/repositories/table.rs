//! Table repository implementation.

use sqlx::PgPool;

use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_core::types::id::{BranchId, TableId};
use tablehub_entity::table::{Table, TableLocation};

/// Repository for table lookups and capacity filtering.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    /// Create a new table repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a table by ID.
    pub async fn find_by_id(&self, id: TableId) -> AppResult<Option<Table>> {
        sqlx::query_as::<_, Table>("SELECT * FROM tables WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find table", e))
    }

    /// Find an active table by ID.
    pub async fn find_active_by_id(&self, id: TableId) -> AppResult<Option<Table>> {
        sqlx::query_as::<_, Table>("SELECT * FROM tables WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find active table", e)
            })
    }

    /// List active tables of a branch whose capacity range contains
    /// `party_size`, optionally filtered by location, in stable
    /// table-number order.
    pub async fn find_capacity_eligible(
        &self,
        branch_id: BranchId,
        party_size: i32,
        location: Option<TableLocation>,
    ) -> AppResult<Vec<Table>> {
        match location {
            Some(loc) => sqlx::query_as::<_, Table>(
                "SELECT * FROM tables WHERE branch_id = $1 AND is_active = TRUE \
                 AND min_capacity <= $2 AND max_capacity >= $2 AND location = $3 \
                 ORDER BY table_number ASC, id ASC",
            )
            .bind(branch_id)
            .bind(party_size)
            .bind(loc)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, Table>(
                "SELECT * FROM tables WHERE branch_id = $1 AND is_active = TRUE \
                 AND min_capacity <= $2 AND max_capacity >= $2 \
                 ORDER BY table_number ASC, id ASC",
            )
            .bind(branch_id)
            .bind(party_size)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list eligible tables", e)
        })
    }
}
