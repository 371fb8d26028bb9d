//! Branch repository implementation.

use sqlx::PgPool;

use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_core::types::id::BranchId;
use tablehub_entity::branch::Branch;

/// Repository for branch lookups.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    /// Create a new branch repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a branch by ID.
    pub async fn find_by_id(&self, id: BranchId) -> AppResult<Option<Branch>> {
        sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find branch", e))
    }
}
