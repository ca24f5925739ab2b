use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BondCalcError {
    /// `years_to_maturity * periods_per_year` is not a whole number of coupon periods.
    #[error("Invalid period count: years to maturity times coupon frequency must be a whole number of periods (got {computed})")]
    InvalidPeriodCount { computed: Decimal },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A coupon, yield or running total left the representable Decimal range.
    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BondCalcError {
    fn from(e: serde_json::Error) -> Self {
        BondCalcError::SerializationError(e.to_string())
    }
}
