//! # Validation Module
//!
//! Field validators shared by the catalog records and the preference
//! parsers. Cart operations do not validate: unknown ids are no-ops.

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that a text field is not blank.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_required;
///
/// assert!(validate_required("name", "Mug").is_ok());
/// assert!(validate_required("name", "  ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that a decimal amount is zero or positive.
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that `value` is one of `allowed`, returning the matched entry.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_one_of;
///
/// assert_eq!(validate_one_of("theme", "dark", &["light", "dark"]), Ok("dark"));
/// assert!(validate_one_of("theme", "Dark", &["light", "dark"]).is_err());
/// ```
pub fn validate_one_of<'a>(
    field: &str,
    value: &str,
    allowed: &[&'a str],
) -> ValidationResult<&'a str> {
    allowed
        .iter()
        .find(|candidate| **candidate == value)
        .copied()
        .ok_or_else(|| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
}
