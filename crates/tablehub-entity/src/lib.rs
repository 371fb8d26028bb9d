//! # tablehub-entity
//!
//! Domain entity models for TableHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! Cross-entity references are typed identifiers resolved through explicit
//! store lookups — there are no embedded navigation objects or lazy
//! associations.

pub mod booking;
pub mod branch;
pub mod coupon;
pub mod diner;
pub mod table;
pub mod timeslot;
