//! Shared value types used across the TableHub crates.

pub mod id;
