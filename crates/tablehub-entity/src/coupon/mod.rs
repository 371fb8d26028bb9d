//! Coupon entity: code-keyed discounts redeemed at booking time.

pub mod discount;
pub mod model;

pub use discount::DiscountType;
pub use model::Coupon;
