//! Required-value rule.

use super::FieldValidator;
use crate::domain::field::{Field, FieldError};

/// Rejects blank values on visible required fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl FieldValidator for RequiredValidator {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        if field.is_required() && field.is_visible() && field.is_empty() {
            return Err(FieldError::Required);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldName;
    use rstest::rstest;

    #[rstest]
    #[case("", Err(FieldError::Required))]
    #[case("   ", Err(FieldError::Required))]
    #[case("\n\t", Err(FieldError::Required))]
    #[case("x", Ok(()))]
    fn blank_required_values_fail(#[case] value: &str, #[case] expected: Result<(), FieldError>) {
        let field = Field::text(FieldName::Mailbox).required().prefilled(value);
        assert_eq!(RequiredValidator.validate(&field), expected);
    }

    #[rstest]
    fn optional_fields_pass_when_blank() {
        let field = Field::text(FieldName::Name);
        assert_eq!(RequiredValidator.validate(&field), Ok(()));
    }
}
