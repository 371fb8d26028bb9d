//! Table location enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical location of a table within the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "table_location", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TableLocation {
    /// Inside the main dining room.
    Indoor,
    /// Outdoor seating area.
    Outdoor,
    /// Terrace seating.
    Terrace,
    /// Unspecified / default placement.
    Standard,
    /// Private dining room.
    PrivateRoom,
    /// Bar seating.
    Bar,
}

impl TableLocation {
    /// Return the location as a lowercase snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indoor => "indoor",
            Self::Outdoor => "outdoor",
            Self::Terrace => "terrace",
            Self::Standard => "standard",
            Self::PrivateRoom => "private_room",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for TableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableLocation {
    type Err = tablehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indoor" => Ok(Self::Indoor),
            "outdoor" => Ok(Self::Outdoor),
            "terrace" => Ok(Self::Terrace),
            "standard" => Ok(Self::Standard),
            "private_room" => Ok(Self::PrivateRoom),
            "bar" => Ok(Self::Bar),
            _ => Err(tablehub_core::AppError::invalid_input(format!(
                "Invalid table location: '{s}'. Expected one of: indoor, outdoor, terrace, standard, private_room, bar"
            ))),
        }
    }
}
