//! Coupon cash-flow schedule for a bullet bond.

use chrono::{DateTime, Datelike, Days, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::fixed_income::metrics::coupon_per_period;
use crate::types::Money;
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the schedule base date when the caller does not fix one.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One coupon period of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based period index
    pub period: u32,
    pub payment_date: DateTime<Utc>,
    pub coupon_payment: Money,
    /// Coupons paid up to and including this period
    pub cumulative_interest: Money,
    /// Face value until the final period, zero once principal is repaid
    pub remaining_principal: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the `n_periods` row cash-flow table. Period `i` pays on
/// `base_date + i * (12 / periods_per_year)` calendar months.
pub fn build_schedule(
    face_value: Money,
    coupon_rate_pct: Decimal,
    periods_per_year: u32,
    n_periods: u32,
    base_date: DateTime<Utc>,
) -> BondCalcResult<Vec<ScheduleRow>> {
    let coupon = coupon_per_period(face_value, coupon_rate_pct, periods_per_year)?;
    let period_months = 12 / periods_per_year;
    let month_offset = |period: u32| {
        period.checked_mul(period_months).ok_or_else(|| {
            BondCalcError::DateError(format!("Month offset overflow at period {period}"))
        })
    };

    // Maturity is the latest date; if it cannot be represented no row is built.
    add_calendar_months(base_date, month_offset(n_periods)?)?;

    (1..=n_periods)
        .map(|period| {
            let cumulative_interest = coupon
                .checked_mul(Decimal::from(period))
                .ok_or_else(|| BondCalcError::ArithmeticOverflow {
                    context: format!("cumulative interest at period {period}"),
                })?;
            Ok(ScheduleRow {
                period,
                payment_date: add_calendar_months(base_date, month_offset(period)?)?,
                coupon_payment: coupon,
                cumulative_interest,
                remaining_principal: if period < n_periods {
                    face_value
                } else {
                    Decimal::ZERO
                },
            })
        })
        .collect()
}

/// Advance `date` by whole calendar months, keeping the time of day.
///
/// The day of month is carried over; if the target month is too short the
/// surplus days roll into the next month (31 Aug + 6 months = 3 Mar, or
/// 2 Mar in a leap year).
pub fn add_calendar_months(date: DateTime<Utc>, months: u32) -> BondCalcResult<DateTime<Utc>> {
    let day_offset = u64::from(date.day() - 1);
    let overflow = || BondCalcError::DateError(format!("Adding {months} months to {date} overflowed"));

    let rolled = date
        .date_naive()
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(Days::new(day_offset)))
        .ok_or_else(overflow)?;

    Ok(rolled.and_time(date.time()).and_utc())
}
