//! Money handling for the NUMERIC columns.
//!
//! Amounts are stored with two decimal places, so anything derived from an amount
//! (fees, surcharges) is computed from the value rounded the way Postgres rounds it.

use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidationError;

/// Exclusive upper bound for `NUMERIC(10, 2)` columns (prices and costs)
pub const MAX_PRICE: i64 = 100_000_000;

/// Exclusive upper bound for `NUMERIC(12, 2)` columns (salaries, fees and payments)
pub const MAX_AMOUNT: i64 = 10_000_000_000;

/// Round to cents with ties away from zero, matching a `NUMERIC(p, 2)` cast
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn check_range(value: &Decimal, limit: i64, message: &'static str) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative")
            .with_message("Amount must not be negative".into()));
    }
    if round_to_cents(*value) >= Decimal::from(limit) {
        return Err(ValidationError::new("out_of_range").with_message(message.into()));
    }
    Ok(())
}

/// Validator for values stored in `NUMERIC(10, 2)`
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    check_range(value, MAX_PRICE, "Amount must be less than 100000000")
}

/// Validator for values stored in or compared against `NUMERIC(12, 2)`
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    check_range(value, MAX_AMOUNT, "Amount must be less than 10000000000")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_matches_numeric_cast() {
        assert_eq!(round_to_cents(Decimal::new(30000004, 3)), Decimal::new(3000000, 2));
        assert_eq!(round_to_cents(Decimal::new(30000005, 3)), Decimal::new(3000001, 2));
        assert_eq!(round_to_cents(Decimal::new(-15, 3)), Decimal::new(-2, 2));
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(9999999999, 2)).is_ok());
        assert!(validate_price(&Decimal::from(MAX_PRICE)).is_err());
        // rounds up to the bound
        assert!(validate_price(&Decimal::new(99999999999, 3)).is_err());
        assert!(validate_price(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(&Decimal::from(9_999_999_999i64)).is_ok());
        let err = validate_amount(&Decimal::from(100_000_000_000i64)).unwrap_err();
        assert_eq!(err.code, "out_of_range");
    }
}
