//! Repository implementations for all TableHub entities.

pub mod booking;
pub mod branch;
pub mod coupon;
pub mod table;
pub mod timeslot;

pub use booking::BookingRepository;
pub use branch::BranchRepository;
pub use coupon::CouponRepository;
pub use table::TableRepository;
pub use timeslot::TimeSlotRepository;
