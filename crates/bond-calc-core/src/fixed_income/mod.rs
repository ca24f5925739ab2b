//! Fixed-rate bullet bond analytics: period resolution, closed-form yield
//! metrics, bisection yield-to-maturity and the coupon cash-flow schedule.

pub mod bond;
pub mod metrics;
pub mod periods;
pub mod schedule;
pub mod ytm;

pub use bond::{
    bond_schedule, calculate_bond, calculate_bond_with_clock, validate_bond_input, BondInput,
    BondResult,
};
pub use periods::CouponFrequency;
pub use schedule::{Clock, FixedClock, ScheduleRow, SystemClock};
