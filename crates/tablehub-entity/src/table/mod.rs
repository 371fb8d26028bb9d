//! Table entity: a physical seating unit scoped to one branch.

pub mod location;
pub mod model;

pub use location::TableLocation;
pub use model::Table;
