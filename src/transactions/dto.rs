use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use super::repo::TransactionChanges;
use crate::error::AppError;

/// Body for create and PUT (full replace).
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub amount: Decimal,
    pub date: Date,
    pub category: String,
    pub description: String,
}

/// Optional month/year filter for the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<u8>,
    pub year: Option<i32>,
}

const MAX_CATEGORY_LEN: usize = 255;

// NUMERIC(10,2): 2 fractional digits, 8 integral.
fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount.normalize().scale() > 2 {
        return Err(AppError::validation(
            "amount",
            "at most 2 decimal places allowed",
        ));
    }
    if amount.abs() >= Decimal::new(100_000_000, 0) {
        return Err(AppError::validation(
            "amount",
            "at most 10 significant digits allowed",
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if category.trim().is_empty() {
        return Err(AppError::validation("category", "must not be empty"));
    }
    if category.len() > MAX_CATEGORY_LEN {
        return Err(AppError::validation(
            "category",
            "must be at most 255 characters",
        ));
    }
    Ok(())
}

pub fn validate_payload(payload: &TransactionPayload) -> Result<(), AppError> {
    validate_amount(payload.amount)?;
    validate_category(&payload.category)
}

pub fn validate_changes(changes: &TransactionChanges) -> Result<(), AppError> {
    if let Some(amount) = changes.amount {
        validate_amount(amount)?;
    }
    if let Some(category) = changes.category.as_deref() {
        validate_category(category)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_two_decimal_places() {
        assert!(validate_amount(dec!(50.00)).is_ok());
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(99999999.99)).is_ok());
    }

    #[test]
    fn trailing_zeros_do_not_count_as_extra_precision() {
        assert!(validate_amount(dec!(50.000)).is_ok());
    }

    #[test]
    fn rejects_three_decimal_places() {
        let err = validate_amount(dec!(10.005)).unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "amount"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_more_than_ten_digits() {
        assert!(validate_amount(dec!(100000000.00)).is_err());
        assert!(validate_amount(dec!(-100000000.00)).is_err());
    }

    #[test]
    fn rejects_blank_category() {
        assert!(validate_category("   ").is_err());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn rejects_oversized_category() {
        let long = "x".repeat(256);
        assert!(validate_category(&long).is_err());
        let max = "x".repeat(255);
        assert!(validate_category(&max).is_ok());
    }

    #[test]
    fn empty_changes_are_valid() {
        assert!(validate_changes(&TransactionChanges::default()).is_ok());
    }

    #[test]
    fn changes_with_bad_amount_are_rejected() {
        let changes = TransactionChanges {
            amount: Some(dec!(1.234)),
            ..TransactionChanges::default()
        };
        assert!(validate_changes(&changes).is_err());
    }
}
