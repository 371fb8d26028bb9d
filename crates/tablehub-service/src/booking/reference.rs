//! External booking reference generation.

use chrono::Utc;
use uuid::Uuid;

/// Generates a guest-facing booking reference:
/// `{prefix}{yyMMddHHmmss}{6 uppercase hex chars}`.
///
/// The timestamp is UTC at generation time and the suffix comes from a
/// fresh v4 UUID, so collisions within one second are as unlikely as a
/// UUID prefix collision. Uniqueness is still enforced by the store's
/// unique index on the reference.
pub fn generate_booking_reference(prefix: &str) -> String {
    let stamp = Utc::now().format("%y%m%d%H%M%S");
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("{prefix}{stamp}{suffix}")
}
