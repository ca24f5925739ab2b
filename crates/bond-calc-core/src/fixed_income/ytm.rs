//! Yield-to-maturity by bisection on the bond pricing equation.
//!
//! The present value of a bullet bond is strictly decreasing in the periodic
//! rate for `r > -1`, so a fixed bracket plus bisection always lands on the
//! unique root (or on a bracket bound when the price lies outside the range
//! the bracket can represent).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fixed_income::metrics;
use crate::types::{Money, Rate};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lower bound of the periodic-rate bracket.
pub const LOWER_BRACKET: Rate = dec!(-0.99);

/// Upper bound of the periodic-rate bracket.
pub const UPPER_BRACKET: Rate = dec!(10);

/// Hard cap on bisection steps.
pub const MAX_BISECTION_ITERATIONS: u32 = 200;

/// Absolute price tolerance for early exit (1e-10).
pub const PRICE_TOLERANCE: Decimal = dec!(0.0000000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the bisection terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// |PV(r) - price| fell below the tolerance.
    Converged,
    /// Price is at or above PV at the lower bracket bound.
    ClampedLower,
    /// Price is at or below PV at the upper bracket bound.
    ClampedUpper,
    /// Iteration cap reached; the rate is the midpoint of the final bracket.
    IterationLimit,
}

/// Periodic yield solved from price, with solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtmSolution {
    /// Periodic discount rate (not annualized).
    pub periodic_rate: Rate,
    /// Bisection steps taken (0 when clamped).
    pub iterations: u32,
    pub status: SolveStatus,
}

impl YtmSolution {
    /// Nominal annual yield: periodic rate times periods per year.
    pub fn annualized(&self, periods_per_year: u32) -> Rate {
        self.periodic_rate * Decimal::from(periods_per_year)
    }

    /// Human-readable note for any outcome other than convergence.
    pub fn warning(&self) -> Option<String> {
        match self.status {
            SolveStatus::Converged => None,
            SolveStatus::ClampedLower => Some(format!(
                "Market price is at or above the present value at the lowest bracketed \
                 periodic rate; YTM clamped to periodic rate {LOWER_BRACKET}"
            )),
            SolveStatus::ClampedUpper => Some(format!(
                "Market price is at or below the present value at the highest bracketed \
                 periodic rate; YTM clamped to periodic rate {UPPER_BRACKET}"
            )),
            SolveStatus::IterationLimit => Some(format!(
                "YTM bisection did not reach the price tolerance within {} iterations; \
                 using the midpoint of the final bracket",
                self.iterations
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of `n_periods` coupons plus principal at maturity,
/// discounted at the periodic rate `rate`:
///   PV = sum_{t=1}^{N} C / (1+r)^t + F / (1+r)^N
///
/// Returns `None` when the value is unbounded: `rate <= -1`, or the
/// compounding factor underflows to zero (rates near -1 over many periods).
/// When the factor overflows (large rates over many periods) the remaining
/// discounted terms are negligible and are dropped.
pub fn present_value(
    coupon_per_period: Money,
    face_value: Money,
    n_periods: u32,
    rate: Rate,
) -> Option<Money> {
    if rate <= dec!(-1) {
        return None;
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut compound = Decimal::ONE;
    let mut pv = Decimal::ZERO;

    for _ in 0..n_periods {
        compound = match compound.checked_mul(one_plus_r) {
            Some(next) => next,
            None if one_plus_r > Decimal::ONE => return Some(pv),
            None => return None,
        };
        if compound.is_zero() {
            return None;
        }
        pv = pv.checked_add(coupon_per_period.checked_div(compound)?)?;
    }

    pv.checked_add(face_value.checked_div(compound)?)
}

/// Solve for the periodic rate `r` with `present_value(r) == market_price`.
///
/// Bisection over `[LOWER_BRACKET, UPPER_BRACKET]`. Prices outside the
/// bracketed PV range clamp to the nearest bound instead of failing. The
/// loop exits early once |PV(mid) - price| < `PRICE_TOLERANCE`; if the cap
/// is exhausted the midpoint of the final bracket is returned.
pub fn solve_periodic_ytm(
    market_price: Money,
    coupon_per_period: Money,
    face_value: Money,
    n_periods: u32,
) -> YtmSolution {
    let mut r_lo = LOWER_BRACKET;
    let mut r_hi = UPPER_BRACKET;

    // None is +infinity: no finite price reaches it from above.
    let pv_lo = present_value(coupon_per_period, face_value, n_periods, r_lo);
    if pv_lo.is_some_and(|pv| market_price >= pv) {
        debug!(%market_price, "price above bracketed PV range, clamping YTM to lower bound");
        return YtmSolution {
            periodic_rate: r_lo,
            iterations: 0,
            status: SolveStatus::ClampedLower,
        };
    }

    let pv_hi = present_value(coupon_per_period, face_value, n_periods, r_hi);
    if pv_hi.map_or(true, |pv| market_price <= pv) {
        debug!(%market_price, "price below bracketed PV range, clamping YTM to upper bound");
        return YtmSolution {
            periodic_rate: r_hi,
            iterations: 0,
            status: SolveStatus::ClampedUpper,
        };
    }

    for iteration in 1..=MAX_BISECTION_ITERATIONS {
        let r_mid = (r_lo + r_hi) / dec!(2);

        match present_value(coupon_per_period, face_value, n_periods, r_mid) {
            Some(pv_mid) if (pv_mid - market_price).abs() < PRICE_TOLERANCE => {
                debug!(iterations = iteration, rate = %r_mid, "YTM bisection converged");
                return YtmSolution {
                    periodic_rate: r_mid,
                    iterations: iteration,
                    status: SolveStatus::Converged,
                };
            }
            // PV is decreasing in r: root is at or below the midpoint
            Some(pv_mid) if pv_mid <= market_price => r_hi = r_mid,
            _ => r_lo = r_mid,
        }
    }

    let r_final = (r_lo + r_hi) / dec!(2);
    warn!(
        iterations = MAX_BISECTION_ITERATIONS,
        rate = %r_final,
        "YTM bisection hit the iteration limit"
    );
    YtmSolution {
        periodic_rate: r_final,
        iterations: MAX_BISECTION_ITERATIONS,
        status: SolveStatus::IterationLimit,
    }
}

/// Annualized yield to maturity (periodic rate times periods per year).
pub fn ytm_annual(
    market_price: Money,
    face_value: Money,
    coupon_rate_pct: Decimal,
    periods_per_year: u32,
    n_periods: u32,
) -> BondCalcResult<Rate> {
    let coupon = metrics::coupon_per_period(face_value, coupon_rate_pct, periods_per_year)?;
    Ok(solve_periodic_ytm(market_price, coupon, face_value, n_periods).annualized(periods_per_year))
}
