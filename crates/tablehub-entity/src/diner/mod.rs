//! Diner entity: the minimal guest account record.

pub mod model;

pub use model::Diner;
