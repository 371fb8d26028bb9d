//! Meal type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which meal service a time slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast service.
    Breakfast,
    /// Lunch service.
    Lunch,
    /// Dinner service.
    Dinner,
    /// Brunch service.
    Brunch,
    /// Slot valid all day.
    AllDay,
}

impl MealType {
    /// Return the meal type as a lowercase snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Brunch => "brunch",
            Self::AllDay => "all_day",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
