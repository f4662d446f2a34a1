use rust_decimal::Decimal;
use thiserror::Error;

/// Boundary errors for user-issued conversions. State transitions
/// themselves never fail; these reject malformed intents before one
/// is applied.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("No rate available for currency: {code}")]
    UnknownCurrency { code: String },

    #[error("Conversion amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
}
