//! # tablehub-database
//!
//! PostgreSQL connection management, per-entity repository implementations,
//! and the [`store::ReservationStore`] contract consumed by the service
//! layer. Ships two store implementations: `PgReservationStore` (production)
//! and `MemoryReservationStore` (embedded, used by demos and tests).

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{MemoryReservationStore, PgReservationStore, ReservationStore};
