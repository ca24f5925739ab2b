//! Bond yield and cash-flow analysis for fixed-rate bullet bonds.
//!
//! Sequences period resolution, the closed-form metrics, the bisection YTM
//! solve and the schedule build, and wraps the result in the standard
//! computation envelope.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::BondCalcError;
use crate::fixed_income::metrics::{self, PremiumDiscount};
use crate::fixed_income::periods::{self, CouponFrequency};
use crate::fixed_income::schedule::{self, Clock, ScheduleRow, SystemClock};
use crate::fixed_income::ytm::{self, MAX_BISECTION_ITERATIONS};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for bond analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    /// Par / face value, repaid in full at maturity
    pub face_value: Money,
    /// Annual coupon rate in percent (8 = 8%)
    pub annual_coupon_rate_pct: Decimal,
    /// Market price, same currency unit as face value
    pub market_price: Money,
    /// Years remaining to maturity; must give a whole number of coupon periods
    pub years_to_maturity: Years,
    pub coupon_frequency: CouponFrequency,
}

/// Output of bond analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondResult {
    /// Annual coupon / market price (ratio, not percent)
    pub current_yield: Rate,
    /// Periodic yield to maturity times periods per year
    pub ytm_annual: Rate,
    /// Total coupon income over the life of the bond
    pub total_interest: Money,
    pub premium_discount: PremiumDiscount,
    pub periods_per_year: u32,
    pub period_count: u32,
    pub coupon_per_period: Money,
    pub schedule: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a bond, dating the schedule from the current time.
pub fn calculate_bond(input: &BondInput) -> BondCalcResult<ComputationOutput<BondResult>> {
    calculate_bond_with_clock(input, &SystemClock)
}

/// Analyse a bond, dating the schedule from `clock.now()`.
pub fn calculate_bond_with_clock(
    input: &BondInput,
    clock: &impl Clock,
) -> BondCalcResult<ComputationOutput<BondResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation --
    validate_bond_input(input)?;

    let periods_per_year = periods::periods_per_year(input.coupon_frequency);
    let n_periods = periods::compute_period_count(input.years_to_maturity, periods_per_year)?;

    // -- Closed-form metrics --
    let coupon = metrics::coupon_per_period(
        input.face_value,
        input.annual_coupon_rate_pct,
        periods_per_year,
    )?;
    let current_yield = metrics::current_yield(
        input.face_value,
        input.annual_coupon_rate_pct,
        input.market_price,
    )?;
    let total_interest = metrics::total_interest(
        input.face_value,
        input.annual_coupon_rate_pct,
        periods_per_year,
        n_periods,
    )?;
    let premium_discount = metrics::premium_discount(input.market_price, input.face_value);

    // -- Cash-flow schedule (dated before the YTM solve) --
    let base_date = clock.now();
    let schedule = schedule::build_schedule(
        input.face_value,
        input.annual_coupon_rate_pct,
        periods_per_year,
        n_periods,
        base_date,
    )?;

    // -- YTM via bisection --
    let solution = ytm::solve_periodic_ytm(input.market_price, coupon, input.face_value, n_periods);
    if let Some(w) = solution.warning() {
        warnings.push(w);
    }
    let ytm_annual = solution.annualized(periods_per_year);

    debug!(
        n_periods,
        ytm = %ytm_annual,
        iterations = solution.iterations,
        "bond analysis complete"
    );

    let output = BondResult {
        current_yield,
        ytm_annual,
        total_interest,
        premium_discount,
        periods_per_year,
        period_count: n_periods,
        coupon_per_period: coupon,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ytm_method": "bisection",
        "bracket_periodic_rate": [ytm::LOWER_BRACKET.to_string(), ytm::UPPER_BRACKET.to_string()],
        "price_tolerance": "1e-10",
        "max_iterations": MAX_BISECTION_ITERATIONS,
        "ytm_iterations": solution.iterations,
        "ytm_status": solution.status,
        "principal": "bullet (repaid at maturity)",
        "schedule_base_date": base_date.to_rfc3339(),
        "date_roll": "calendar months, day-of-month overflow rolls forward"
    });

    Ok(with_metadata(
        "Bond Yield & Cash-Flow Analysis (bullet bond, whole coupon periods)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Validate a bond and build only its coupon schedule, skipping the yield
/// computations.
pub fn bond_schedule(
    input: &BondInput,
    base_date: DateTime<Utc>,
) -> BondCalcResult<Vec<ScheduleRow>> {
    validate_bond_input(input)?;
    let periods_per_year = periods::periods_per_year(input.coupon_frequency);
    let n_periods = periods::compute_period_count(input.years_to_maturity, periods_per_year)?;
    schedule::build_schedule(
        input.face_value,
        input.annual_coupon_rate_pct,
        periods_per_year,
        n_periods,
        base_date,
    )
}

/// Field-level checks on a caller-supplied bond. Period-count validity is
/// checked separately by [`periods::compute_period_count`].
pub fn validate_bond_input(input: &BondInput) -> BondCalcResult<()> {
    if input.face_value <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "face_value".into(),
            reason: "Face value must be greater than 0".into(),
        });
    }
    if input.annual_coupon_rate_pct < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "annual_coupon_rate_pct".into(),
            reason: "Annual coupon rate must be >= 0".into(),
        });
    }
    if input.market_price <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "market_price".into(),
            reason: "Market price must be greater than 0".into(),
        });
    }
    if input.years_to_maturity <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "Years to maturity must be greater than 0".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_income::schedule::FixedClock;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_input() -> BondInput {
        BondInput {
            face_value: dec!(1000),
            annual_coupon_rate_pct: dec!(8),
            market_price: dec!(950),
            years_to_maturity: dec!(5),
            coupon_frequency: CouponFrequency::SemiAnnual,
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_sample_bond_envelope() {
        let out = calculate_bond_with_clock(&sample_input(), &clock()).unwrap();
        assert_eq!(out.result.total_interest, dec!(400));
        assert_eq!(out.result.premium_discount, PremiumDiscount::Discount);
        assert_eq!(out.result.period_count, 10);
        assert_eq!(out.result.periods_per_year, 2);
        assert_eq!(out.result.coupon_per_period, dec!(40));
        assert_eq!(out.result.schedule.len(), 10);
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.assumptions["ytm_method"], "bisection");
        assert_eq!(out.assumptions["ytm_status"], "converged");
    }

    #[test]
    fn test_invalid_period_count_surfaces() {
        let mut input = sample_input();
        input.years_to_maturity = dec!(2.5);
        input.coupon_frequency = CouponFrequency::Annual;
        let err = calculate_bond_with_clock(&input, &clock()).unwrap_err();
        assert!(matches!(err, BondCalcError::InvalidPeriodCount { .. }));
    }

    #[test]
    fn test_rejects_non_positive_face_value() {
        let mut input = sample_input();
        input.face_value = Decimal::ZERO;
        match calculate_bond_with_clock(&input, &clock()).unwrap_err() {
            BondCalcError::InvalidInput { field, .. } => assert_eq!(field, "face_value"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_coupon_rate() {
        let mut input = sample_input();
        input.annual_coupon_rate_pct = dec!(-0.5);
        match validate_bond_input(&input).unwrap_err() {
            BondCalcError::InvalidInput { field, .. } => {
                assert_eq!(field, "annual_coupon_rate_pct")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_positive_price_and_years() {
        let mut input = sample_input();
        input.market_price = dec!(-1);
        assert!(validate_bond_input(&input).is_err());

        let mut input = sample_input();
        input.years_to_maturity = Decimal::ZERO;
        assert!(validate_bond_input(&input).is_err());
    }

    #[test]
    fn test_zero_coupon_rate_is_valid() {
        let mut input = sample_input();
        input.annual_coupon_rate_pct = Decimal::ZERO;
        let out = calculate_bond_with_clock(&input, &clock()).unwrap();
        assert_eq!(out.result.current_yield, Decimal::ZERO);
        assert!(out.result.ytm_annual > Decimal::ZERO);
    }

    #[test]
    fn test_clamped_solve_adds_warning() {
        let input = BondInput {
            face_value: dec!(1000),
            annual_coupon_rate_pct: Decimal::ZERO,
            market_price: dec!(50),
            years_to_maturity: dec!(1),
            coupon_frequency: CouponFrequency::Annual,
        };
        let out = calculate_bond_with_clock(&input, &clock()).unwrap();
        assert_eq!(out.result.ytm_annual, dec!(10));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("clamped"));
    }

    #[test]
    fn test_schedule_only_matches_full_analysis() {
        let input = sample_input();
        let full = calculate_bond_with_clock(&input, &clock()).unwrap();
        let rows = bond_schedule(&input, clock().now()).unwrap();
        assert_eq!(rows, full.result.schedule);
    }

    #[test]
    fn test_schedule_only_still_validates() {
        let mut input = sample_input();
        input.years_to_maturity = dec!(2.3);
        assert!(matches!(
            bond_schedule(&input, clock().now()),
            Err(BondCalcError::InvalidPeriodCount { .. })
        ));
    }

    #[test]
    fn test_coupon_overflow_is_an_error_not_a_panic() {
        let input = BondInput {
            face_value: dec!(1000000000000000000000000000),
            annual_coupon_rate_pct: dec!(100),
            market_price: dec!(1000),
            years_to_maturity: dec!(1),
            coupon_frequency: CouponFrequency::Annual,
        };
        assert!(validate_bond_input(&input).is_ok());
        assert!(matches!(
            calculate_bond_with_clock(&input, &clock()),
            Err(BondCalcError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_current_yield_overflow_is_an_error_not_a_panic() {
        let input = BondInput {
            face_value: dec!(100000000000000000000),
            annual_coupon_rate_pct: dec!(8),
            market_price: dec!(0.0000000001),
            years_to_maturity: dec!(1),
            coupon_frequency: CouponFrequency::Annual,
        };
        assert!(validate_bond_input(&input).is_ok());
        match calculate_bond_with_clock(&input, &clock()).unwrap_err() {
            BondCalcError::ArithmeticOverflow { context } => assert_eq!(context, "current yield"),
            other => panic!("Expected ArithmeticOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_undatable_bond_fails_with_date_error() {
        let mut input = sample_input();
        input.years_to_maturity = dec!(300000);
        input.coupon_frequency = CouponFrequency::Annual;
        let started = Instant::now();
        let err = calculate_bond_with_clock(&input, &clock()).unwrap_err();
        assert!(matches!(err, BondCalcError::DateError(_)));
        // No bisection over 300000 periods happened first
        assert!(started.elapsed().as_secs() < 1);
    }

    #[test]
    fn test_input_deserializes_from_json_numbers() {
        let input: BondInput = serde_json::from_str(
            r#"{
                "face_value": 1000,
                "annual_coupon_rate_pct": 8,
                "market_price": 950,
                "years_to_maturity": 2.5,
                "coupon_frequency": "semi-annual"
            }"#,
        )
        .unwrap();
        assert_eq!(input.years_to_maturity, dec!(2.5));
        let out = calculate_bond_with_clock(&input, &clock()).unwrap();
        assert_eq!(out.result.period_count, 5);
    }
}
