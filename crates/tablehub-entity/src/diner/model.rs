//! Diner entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::DinerId;

/// A registered guest. Identity and authentication mechanics live outside
/// this system; only the fields bookings need are modeled here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Diner {
    /// Unique diner identifier.
    pub id: DinerId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
