//! Booking status enumeration and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a booking.
///
/// `Pending -> Confirmed -> {Completed, NoShow}` and
/// `Pending | Confirmed -> Cancelled`. `Cancelled`, `Completed`, and
/// `NoShow` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting confirmation or payment.
    Pending,
    /// Confirmed by staff or by payment success.
    Confirmed,
    /// Cancelled by guest or staff. Never blocks availability again.
    Cancelled,
    /// Visit happened; set by staff post-visit.
    Completed,
    /// Guest did not show; set by staff post-visit.
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this status blocks its table's availability.
    pub fn blocks_table(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::NoShow)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed) => true,
            (Self::Pending | Self::Confirmed, Self::Cancelled) => true,
            (Self::Confirmed, Self::Completed | Self::NoShow) => true,
            _ => false,
        }
    }

    /// Return the status as a lowercase snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = tablehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "no_show" => Ok(Self::NoShow),
            _ => Err(tablehub_core::AppError::invalid_input(format!(
                "Invalid booking status: '{s}'. Expected one of: pending, confirmed, cancelled, completed, no_show"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_never_blocks() {
        assert!(!BookingStatus::Cancelled.blocks_table());
        assert!(BookingStatus::Pending.blocks_table());
        assert!(BookingStatus::Confirmed.blocks_table());
        assert!(BookingStatus::NoShow.blocks_table());
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        for terminal in [
            BookingStatus::Cancelled,
            BookingStatus::Completed,
            BookingStatus::NoShow,
        ] {
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
                BookingStatus::Completed,
                BookingStatus::NoShow,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_pending_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }
}
