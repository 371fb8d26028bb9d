//! Branch entity: the booking policy owner.

pub mod model;

pub use model::Branch;
