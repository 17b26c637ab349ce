//! Remote mailbox availability rule.

use tracing::warn;

use crate::domain::field::FieldError;
use crate::domain::ports::{AvailabilityQuery, MailboxAvailability, MailboxAvailabilityChecker};
use crate::domain::provider::Provider;

/// Asks the availability port whether a mailbox can be created.
///
/// Only providers with a remote check consult the port; for the others the
/// validator always passes. Port failures never propagate: they become
/// [`FieldError::AvailabilityUnknown`].
pub struct MailboxAvailabilityValidator<'a> {
    provider: Provider,
    checker: &'a dyn MailboxAvailabilityChecker,
}

impl<'a> MailboxAvailabilityValidator<'a> {
    /// Build a validator for `provider` backed by `checker`.
    pub fn new(provider: Provider, checker: &'a dyn MailboxAvailabilityChecker) -> Self {
        Self { provider, checker }
    }

    /// Check `query` and report the error the mailbox field should display.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MailboxUnavailable`] when the service rejects the
    /// mailbox and [`FieldError::AvailabilityUnknown`] when the check fails.
    pub async fn validate(&self, query: &AvailabilityQuery) -> Result<(), FieldError> {
        if !self.provider.checks_availability() {
            return Ok(());
        }

        match self.checker.check(query).await {
            Ok(MailboxAvailability::Available) => Ok(()),
            Ok(MailboxAvailability::Unavailable { message }) => {
                Err(FieldError::MailboxUnavailable { message })
            }
            Err(error) => {
                warn!(
                    provider = %self.provider,
                    domain = %query.domain,
                    error = %error,
                    "mailbox availability check failed"
                );
                Err(FieldError::AvailabilityUnknown)
            }
        }
    }
}
