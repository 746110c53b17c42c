//! Token amount parsing.

use alloy_primitives::U256;
use alloy_primitives::utils::{ParseUnits, UnitsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("invalid token amount: {0}")]
    Invalid(#[from] UnitsError),

    #[error("token amounts cannot be negative")]
    Negative,
}

/// Parse a human decimal amount string into its fixed-point integer form,
/// scaled by the token's decimal count.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    match alloy_primitives::utils::parse_units(amount, decimals)? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(AmountError::Negative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_decimals() {
        assert_eq!(parse_token_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_token_amount("0.000001", 6).unwrap(), U256::from(1u64));
        assert_eq!(
            parse_token_amount("10", 18).unwrap(),
            U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(parse_token_amount("-1", 6).is_err());
        assert!(parse_token_amount("one", 6).is_err());
    }
}
