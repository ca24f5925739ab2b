//! Closed-form bond metrics: coupon amounts, current yield, total interest
//! and the premium/discount classification.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::types::{Money, Rate};
use crate::BondCalcResult;

/// Where the market price sits relative to face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumDiscount {
    Premium,
    Discount,
    Par,
}

/// Annual coupon income. `coupon_rate_pct` is in percent units (8 = 8%).
pub fn annual_coupon(face_value: Money, coupon_rate_pct: Decimal) -> BondCalcResult<Money> {
    face_value
        .checked_mul(coupon_rate_pct)
        .map(|v| v / dec!(100))
        .ok_or_else(|| overflow("annual coupon"))
}

/// Coupon paid each period.
pub fn coupon_per_period(
    face_value: Money,
    coupon_rate_pct: Decimal,
    periods_per_year: u32,
) -> BondCalcResult<Money> {
    annual_coupon(face_value, coupon_rate_pct)?
        .checked_div(Decimal::from(periods_per_year))
        .ok_or_else(|| overflow("coupon per period"))
}

/// Current yield = annual coupon / market price.
pub fn current_yield(
    face_value: Money,
    coupon_rate_pct: Decimal,
    market_price: Money,
) -> BondCalcResult<Rate> {
    annual_coupon(face_value, coupon_rate_pct)?
        .checked_div(market_price)
        .ok_or_else(|| overflow("current yield"))
}

/// Total coupon income over the life of the bond.
pub fn total_interest(
    face_value: Money,
    coupon_rate_pct: Decimal,
    periods_per_year: u32,
    n_periods: u32,
) -> BondCalcResult<Money> {
    coupon_per_period(face_value, coupon_rate_pct, periods_per_year)?
        .checked_mul(Decimal::from(n_periods))
        .ok_or_else(|| overflow("total interest"))
}

fn overflow(context: &str) -> BondCalcError {
    BondCalcError::ArithmeticOverflow {
        context: context.into(),
    }
}

/// Exact comparison, no tolerance band around par.
pub fn premium_discount(market_price: Money, face_value: Money) -> PremiumDiscount {
    if market_price > face_value {
        PremiumDiscount::Premium
    } else if market_price < face_value {
        PremiumDiscount::Discount
    } else {
        PremiumDiscount::Par
    }
}
