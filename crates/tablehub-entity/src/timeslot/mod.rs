//! Time slot entity: a named bookable interval scoped to a branch.

pub mod meal;
pub mod model;

pub use meal::MealType;
pub use model::TimeSlot;
