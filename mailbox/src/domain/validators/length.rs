//! Character budget rule.

use super::FieldValidator;
use crate::domain::field::{Field, FieldError};

/// Rejects trimmed values longer than `max` characters.
#[derive(Debug, Clone, Copy)]
pub struct MaximumLengthValidator {
    max: usize,
}

impl MaximumLengthValidator {
    /// Build a validator with the given character budget.
    pub const fn new(max: usize) -> Self {
        Self { max }
    }
}

impl FieldValidator for MaximumLengthValidator {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        if field.text_value().trim().chars().count() > self.max {
            return Err(FieldError::TooLong { max: self.max });
        }
        Ok(())
    }
}
