pub mod error;
pub mod types;

#[cfg(feature = "fixed_income")]
pub mod fixed_income;

pub use error::BondCalcError;
pub use types::*;

/// Standard result type for all bond-calc operations
pub type BondCalcResult<T> = Result<T, BondCalcError>;
