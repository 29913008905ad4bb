//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a plain non-negative decimal such as `"100"` or `"12.5"`.
///
/// No sign, exponent or thousands separators; at most `max_decimals` digits
/// after the point.
pub fn validate_decimal(value: &str, max_decimals: usize, field_name: &str) -> Result<(), String> {
    validate_not_empty(value, field_name)?;

    let value = value.trim();
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(format!("{} must be a number", field_name));
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(format!("{} must be a number", field_name));
    }
    if frac_part.len() > max_decimals {
        return Err(format!(
            "{} supports at most {} decimal places",
            field_name, max_decimals
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("  ", "Amount").is_err());
        assert!(validate_not_empty("1", "Amount").is_ok());
    }

    #[test]
    fn test_validate_decimal_accepts_plain_numbers() {
        assert!(validate_decimal("100", 18, "Amount").is_ok());
        assert!(validate_decimal("12.5", 18, "Amount").is_ok());
        assert!(validate_decimal(".5", 18, "Amount").is_ok());
        assert!(validate_decimal("7.", 18, "Amount").is_ok());
    }

    #[test]
    fn test_validate_decimal_rejects_garbage() {
        assert_eq!(
            validate_decimal("-1", 18, "Amount"),
            Err("Amount must be a number".to_string())
        );
        assert!(validate_decimal("1e3", 18, "Amount").is_err());
        assert!(validate_decimal("1,000", 18, "Amount").is_err());
        assert!(validate_decimal(".", 18, "Amount").is_err());
        assert!(validate_decimal("1.2.3", 18, "Amount").is_err());
    }

    #[test]
    fn test_validate_decimal_limits_precision() {
        assert_eq!(
            validate_decimal("0.123", 2, "Amount"),
            Err("Amount supports at most 2 decimal places".to_string())
        );
    }
}
