//! Password rules.

use super::FieldValidator;
use crate::domain::field::{Field, FieldError};

/// Password length, charset, and whitespace rules.
///
/// Checks run in a fixed order (too short, too long, non-ASCII, surrounding
/// space) and only the first violation is reported.
#[derive(Debug, Clone, Copy)]
pub struct PasswordValidator {
    min: usize,
    max: usize,
}

impl PasswordValidator {
    /// Build a validator accepting `min..=max` characters.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl FieldValidator for PasswordValidator {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let password = field.text_value();
        if password.is_empty() {
            return Ok(());
        }

        let length = password.chars().count();
        if length < self.min {
            return Err(FieldError::PasswordTooShort { min: self.min });
        }
        if length > self.max {
            return Err(FieldError::PasswordTooLong { max: self.max });
        }
        if !password.is_ascii() {
            return Err(FieldError::PasswordNonAscii);
        }
        if password.starts_with(' ') || password.ends_with(' ') {
            return Err(FieldError::PasswordSurroundingSpace);
        }
        Ok(())
    }
}
