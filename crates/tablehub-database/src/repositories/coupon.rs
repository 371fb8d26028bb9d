//! Coupon repository implementation.

use sqlx::PgPool;

use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_entity::coupon::Coupon;

/// Repository for coupon lookups.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    /// Create a new coupon repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active coupon by its code.
    pub async fn find_active_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1 AND is_active = TRUE")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find coupon", e))
    }
}
