//! Composable field validators.
//!
//! Each validator inspects one field and reports at most one error. The
//! pipeline applies validators in a fixed order and stops contributing as
//! soon as the field carries an error, so the first violation wins.

mod availability;
mod email;
mod length;
mod mailbox;
mod password;
mod required;

pub use availability::MailboxAvailabilityValidator;
pub use email::{DomainNameValidator, PasswordResetEmailValidator, is_valid_email};
pub use length::MaximumLengthValidator;
pub use mailbox::{
    ExistingMailboxValidator, MailboxNameValidator, MailboxValidAsEmailValidator,
    PreviouslySpecifiedMailboxValidator,
};
pub use password::PasswordValidator;
pub use required::RequiredValidator;

use super::field::{Field, FieldError};

/// Longest mailbox local part accepted.
pub const MAILBOX_MAX: usize = 64;
/// Longest personal name accepted.
pub const NAME_MAX: usize = 60;
/// Longest email address accepted.
pub const EMAIL_MAX: usize = 254;

/// A synchronous rule applied to one field.
pub trait FieldValidator: Send + Sync {
    /// Inspect `field` and report the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldError`] the field should display.
    fn validate(&self, field: &Field) -> Result<(), FieldError>;
}

/// Apply `validators` to `field` in order.
///
/// An error already present on the field is never overwritten, and no
/// validator runs once one has reported an error.
///
/// # Examples
/// ```
/// use mailbox_forms::domain::validators::{RequiredValidator, run_validators};
/// use mailbox_forms::domain::{Field, FieldError, FieldName};
///
/// let mut field = Field::text(FieldName::Mailbox).required();
/// run_validators(&mut field, &[&RequiredValidator]);
/// assert_eq!(field.error(), Some(&FieldError::Required));
/// ```
pub fn run_validators(field: &mut Field, validators: &[&dyn FieldValidator]) {
    for validator in validators {
        if field.has_error() {
            return;
        }
        if let Err(error) = validator.validate(field) {
            field.set_error(Some(error));
        }
    }
}
