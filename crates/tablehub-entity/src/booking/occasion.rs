//! Booking occasion enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional occasion attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "occasion_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    /// No particular occasion.
    None,
    Birthday,
    Anniversary,
    DateNight,
    BusinessMeeting,
    Celebration,
    Other,
}

impl Default for Occasion {
    fn default() -> Self {
        Self::None
    }
}

impl Occasion {
    /// Return the occasion as a lowercase snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::DateNight => "date_night",
            Self::BusinessMeeting => "business_meeting",
            Self::Celebration => "celebration",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
