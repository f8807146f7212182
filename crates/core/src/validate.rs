//! Field-presence validation helpers.

use thiserror::Error;

/// A required field was missing or empty.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("The '{0}' field is mandatory and cannot be empty")]
pub struct EmptyFieldError(pub &'static str);

/// Rejects a required text field that is missing or blank.
///
/// # Errors
///
/// Returns `EmptyFieldError` naming the offending field.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), EmptyFieldError> {
    if value.trim().is_empty() {
        return Err(EmptyFieldError(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("name", "")]
    #[case("name", "   ")]
    #[case("address.street", "\t\n")]
    fn test_blank_values_rejected(#[case] field: &'static str, #[case] value: &str) {
        let err = require_non_empty(field, value).unwrap_err();
        assert_eq!(err, EmptyFieldError(field));
        assert!(err.to_string().contains(field));
    }

    #[rstest]
    #[case("Lot 4")]
    #[case("x")]
    fn test_non_blank_values_accepted(#[case] value: &str) {
        assert!(require_non_empty("name", value).is_ok());
    }
}
