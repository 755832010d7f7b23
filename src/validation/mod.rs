//! Pure operation-shape validation. Runs before any lock is taken or any
//! transaction is opened, so a malformed request never touches storage.

use bigdecimal::BigDecimal;
use serde_json::Value;
use std::fmt;

use crate::domain::operation::{OperationKind, OPERATION_KINDS};

/// NUMERIC(20, 2) in the schema.
pub const DECIMAL_MAX_DIGITS: usize = 20;
pub const DECIMAL_PLACES: i64 = 2;
pub const AMOUNT_INPUT_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_operation_kind(kind: &str) -> Result<OperationKind, ValidationError> {
    OperationKind::parse(kind).ok_or_else(|| {
        ValidationError::new(
            "operation_type",
            format!("must be one of: {}", OPERATION_KINDS.join(", ")),
        )
    })
}

/// Accepts the amount as it arrives on the wire: a decimal string
/// (preferred, exact) or a bare JSON number. Anything else is rejected
/// here rather than at deserialization, so the caller sees a uniform
/// validation failure.
pub fn parse_amount(value: &Value) -> Result<BigDecimal, ValidationError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => {
            return Err(ValidationError::new(
                "amount",
                "must be a decimal string or number",
            ))
        }
    };

    if text.len() > AMOUNT_INPUT_MAX_LEN {
        return Err(ValidationError::new(
            "amount",
            format!("must be at most {} characters", AMOUNT_INPUT_MAX_LEN),
        ));
    }

    text.parse::<BigDecimal>()
        .map_err(|_| ValidationError::new("amount", "is not a valid decimal"))
}

pub fn validate_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    // Excess precision is rejected, never silently rounded.
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > DECIMAL_PLACES {
        return Err(ValidationError::new(
            "amount",
            format!("must have at most {} decimal places", DECIMAL_PLACES),
        ));
    }

    let (digits, _) = amount.with_scale(DECIMAL_PLACES).as_bigint_and_exponent();
    if digits.to_string().trim_start_matches('-').len() > DECIMAL_MAX_DIGITS {
        return Err(ValidationError::new(
            "amount",
            format!("must have at most {} digits", DECIMAL_MAX_DIGITS),
        ));
    }

    Ok(())
}

/// Full operation-shape check: kind, then amount. Returns the typed kind
/// and the exact amount at ledger scale.
pub fn validate_operation(
    kind: &str,
    amount: &Value,
) -> Result<(OperationKind, BigDecimal), ValidationError> {
    let kind = validate_operation_kind(kind)?;
    let amount = parse_amount(amount)?;
    validate_amount(&amount)?;
    Ok((kind, amount.with_scale(DECIMAL_PLACES)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn validates_operation_kind() {
        assert_eq!(
            validate_operation_kind("DEPOSIT").unwrap(),
            OperationKind::Deposit
        );
        assert_eq!(
            validate_operation_kind("WITHDRAW").unwrap(),
            OperationKind::Withdraw
        );
        assert!(validate_operation_kind("TRANSFER").is_err());
        assert!(validate_operation_kind("withdraw").is_err());
        assert!(validate_operation_kind("").is_err());
    }

    #[test]
    fn parses_string_amounts() {
        assert_eq!(
            parse_amount(&json!("100.50")).unwrap(),
            BigDecimal::from_str("100.50").unwrap()
        );
        assert_eq!(parse_amount(&json!("  7  ")).unwrap(), BigDecimal::from(7));
    }

    #[test]
    fn parses_number_amounts() {
        assert_eq!(parse_amount(&json!(1000)).unwrap(), BigDecimal::from(1000));
        assert_eq!(
            parse_amount(&json!(10.25)).unwrap(),
            BigDecimal::from_str("10.25").unwrap()
        );
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(parse_amount(&json!("abc")).is_err());
        assert!(parse_amount(&json!("")).is_err());
        assert!(parse_amount(&json!(null)).is_err());
        assert!(parse_amount(&json!(["100"])).is_err());
        assert!(parse_amount(&json!({"value": "100"})).is_err());
    }

    #[test]
    fn rejects_oversized_amount_input() {
        let huge = "1".repeat(AMOUNT_INPUT_MAX_LEN + 1);
        assert!(parse_amount(&json!(huge)).is_err());
    }

    #[test]
    fn validates_positive_amount() {
        assert!(validate_amount(&BigDecimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_amount(&BigDecimal::from(-5)).is_err());
        assert!(validate_amount(&BigDecimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(validate_amount(&BigDecimal::from_str("1.005").unwrap()).is_err());
        assert!(validate_amount(&BigDecimal::from_str("0.001").unwrap()).is_err());
        // Trailing zeros beyond the scale are not real precision.
        assert!(validate_amount(&BigDecimal::from_str("1.0500").unwrap()).is_ok());
    }

    #[test]
    fn rejects_amounts_beyond_max_digits() {
        // 19 integer digits + scale 2 exceeds NUMERIC(20, 2).
        let too_big = "9".repeat(19);
        assert!(validate_amount(&BigDecimal::from_str(&too_big).unwrap()).is_err());
        let max_ok = "9".repeat(18);
        assert!(validate_amount(&BigDecimal::from_str(&max_ok).unwrap()).is_ok());
    }

    #[test]
    fn validate_operation_returns_scaled_amount() {
        let (kind, amount) = validate_operation("DEPOSIT", &json!("10.5")).unwrap();
        assert_eq!(kind, OperationKind::Deposit);
        assert_eq!(amount, BigDecimal::from_str("10.50").unwrap());
        let (_, exponent) = amount.as_bigint_and_exponent();
        assert_eq!(exponent, DECIMAL_PLACES);
    }

    #[test]
    fn validate_operation_checks_kind_before_amount() {
        let err = validate_operation("TRANSFER", &json!("bogus")).unwrap_err();
        assert_eq!(err.field, "operation_type");
    }
}
