use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BondCalcError;
use crate::types::Years;
use crate::BondCalcResult;

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouponFrequency {
    /// One coupon per year
    Annual,
    /// Two coupons per year
    SemiAnnual,
}

impl CouponFrequency {
    /// Coupon payments per year.
    pub fn periods_per_year(self) -> u32 {
        periods_per_year(self)
    }

    /// Calendar months between two coupon dates.
    pub fn period_months(self) -> u32 {
        12 / periods_per_year(self)
    }
}

/// Map a coupon frequency to the number of periods per year.
pub fn periods_per_year(frequency: CouponFrequency) -> u32 {
    match frequency {
        CouponFrequency::Annual => 1,
        CouponFrequency::SemiAnnual => 2,
    }
}

/// Number of whole coupon periods to maturity.
///
/// `years * periods_per_year` must be an exact positive integer; anything
/// else fails with [`BondCalcError::InvalidPeriodCount`] carrying the
/// computed product. Decimal arithmetic keeps `2.5 * 2` exactly `5`.
pub fn compute_period_count(years: Years, periods_per_year: u32) -> BondCalcResult<u32> {
    let computed = years
        .checked_mul(Decimal::from(periods_per_year))
        .ok_or_else(|| BondCalcError::ArithmeticOverflow {
            context: "period count".into(),
        })?;

    if !computed.fract().is_zero() || computed <= Decimal::ZERO {
        return Err(BondCalcError::InvalidPeriodCount {
            computed: computed.normalize(),
        });
    }

    let n = computed
        .to_u32()
        .ok_or_else(|| BondCalcError::InvalidPeriodCount {
            computed: computed.normalize(),
        })?;

    debug!(%years, periods_per_year, n, "resolved coupon period count");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periods_per_year_mapping() {
        assert_eq!(periods_per_year(CouponFrequency::Annual), 1);
        assert_eq!(periods_per_year(CouponFrequency::SemiAnnual), 2);
        assert_eq!(CouponFrequency::Annual.period_months(), 12);
        assert_eq!(CouponFrequency::SemiAnnual.period_months(), 6);
    }

    #[test]
    fn test_whole_years_resolve() {
        assert_eq!(compute_period_count(dec!(5), 2).unwrap(), 10);
        assert_eq!(compute_period_count(dec!(3), 1).unwrap(), 3);
    }

    #[test]
    fn test_half_year_semi_annual_accepted() {
        assert_eq!(compute_period_count(dec!(2.5), 2).unwrap(), 5);
    }

    #[test]
    fn test_fractional_product_rejected_with_value() {
        let err = compute_period_count(dec!(2.3), 2).unwrap_err();
        match err {
            BondCalcError::InvalidPeriodCount { computed } => {
                assert_eq!(computed, dec!(4.6));
            }
            other => panic!("Expected InvalidPeriodCount, got {other:?}"),
        }
    }

    #[test]
    fn test_half_year_annual_rejected() {
        let err = compute_period_count(dec!(2.5), 1).unwrap_err();
        assert!(matches!(
            err,
            BondCalcError::InvalidPeriodCount { computed } if computed == dec!(2.5)
        ));
        assert!(err.to_string().contains("2.5"));
    }

    #[test]
    fn test_trailing_zero_scale_is_still_integral() {
        // 5.000 carries scale 3 but no fractional part
        assert_eq!(compute_period_count(dec!(5.000), 1).unwrap(), 5);
    }

    #[test]
    fn test_zero_periods_rejected() {
        assert!(compute_period_count(Decimal::ZERO, 2).is_err());
    }

    #[test]
    fn test_years_near_decimal_max_do_not_panic() {
        let years = dec!(70000000000000000000000000000);
        assert!(matches!(
            compute_period_count(years, 2),
            Err(BondCalcError::ArithmeticOverflow { .. })
        ));
        // Integral but far beyond u32
        assert!(matches!(
            compute_period_count(years, 1),
            Err(BondCalcError::InvalidPeriodCount { .. })
        ));
    }

    #[test]
    fn test_frequency_serde_names() {
        let json = serde_json::to_string(&CouponFrequency::SemiAnnual).unwrap();
        assert_eq!(json, "\"semi-annual\"");
        let parsed: CouponFrequency = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(parsed, CouponFrequency::Annual);
        assert!(serde_json::from_str::<CouponFrequency>("\"quarterly\"").is_err());
    }
}
