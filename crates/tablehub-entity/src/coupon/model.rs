//! Coupon entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tablehub_core::types::id::{BranchId, CouponId, RestaurantId};

use super::discount::DiscountType;

/// A code-keyed discount with a validity window and usage cap, optionally
/// scoped to one restaurant or branch.
///
/// `usage_count` is incremented exactly once per successful booking that
/// redeems the coupon, inside the admission transaction. Coupon lifetime is
/// independent of the bookings that reference it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: CouponId,
    /// The redeemable code.
    pub code: String,
    /// Restaurant scope, if any.
    pub restaurant_id: Option<RestaurantId>,
    /// Branch scope, if any.
    pub branch_id: Option<BranchId>,
    /// Staff-facing description.
    pub description: Option<String>,
    /// How `discount_value` is interpreted.
    pub discount: DiscountType,
    /// Discount magnitude (percent or fixed amount).
    pub discount_value: Option<Decimal>,
    /// First day the coupon is valid.
    pub start_date: DateTime<Utc>,
    /// Last instant the coupon is valid.
    pub end_date: DateTime<Utc>,
    /// Usage cap; `None` = unlimited.
    pub max_usages: Option<i32>,
    /// How many bookings have redeemed this coupon.
    pub usage_count: i32,
    /// Whether the coupon is currently active.
    pub is_active: bool,
    /// When the coupon was created.
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon can still be redeemed at `now`.
    ///
    /// Checks the active flag, expiry, and usage cap. The start date is
    /// stored but not gated on at redemption time.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active || self.end_date < now {
            return false;
        }
        match self.max_usages {
            Some(cap) => self.usage_count < cap,
            None => true,
        }
    }

    /// Discount this coupon yields against a branch's minimum charge.
    ///
    /// Percentage coupons discount a share of `minimum_charge`; fixed
    /// coupons discount their face value. A coupon without a value yields
    /// zero.
    pub fn discount_for(&self, minimum_charge: Option<Decimal>) -> Decimal {
        let Some(value) = self.discount_value else {
            return Decimal::ZERO;
        };
        match self.discount {
            DiscountType::Percentage => {
                minimum_charge.unwrap_or(Decimal::ZERO) * value / Decimal::from(100)
            }
            DiscountType::FixedAmount => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(discount: DiscountType, value: Option<Decimal>) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(),
            code: "WELCOME10".into(),
            restaurant_id: None,
            branch_id: None,
            description: None,
            discount,
            discount_value: value,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            max_usages: Some(5),
            usage_count: 0,
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_redeemable_window_and_cap() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Percentage, Some(Decimal::from(10)));
        assert!(c.is_redeemable(now));

        c.usage_count = 5;
        assert!(!c.is_redeemable(now));

        c.usage_count = 0;
        c.end_date = now - Duration::hours(1);
        assert!(!c.is_redeemable(now));

        c.end_date = now + Duration::days(1);
        c.is_active = false;
        assert!(!c.is_redeemable(now));
    }

    #[test]
    fn test_percentage_discount_of_minimum_charge() {
        let c = coupon(DiscountType::Percentage, Some(Decimal::from(10)));
        assert_eq!(
            c.discount_for(Some(Decimal::from(50))),
            Decimal::from(5)
        );
        // No minimum charge means nothing to take a percentage of.
        assert_eq!(c.discount_for(None), Decimal::ZERO);
    }

    #[test]
    fn test_fixed_discount() {
        let c = coupon(DiscountType::FixedAmount, Some(Decimal::from(15)));
        assert_eq!(c.discount_for(Some(Decimal::from(50))), Decimal::from(15));
        assert_eq!(c.discount_for(None), Decimal::from(15));
    }

    #[test]
    fn test_valueless_coupon_discounts_nothing() {
        let c = coupon(DiscountType::Percentage, None);
        assert_eq!(c.discount_for(Some(Decimal::from(50))), Decimal::ZERO);
    }
}
