//! Batch coordinator for mailboxes created together.
//!
//! [`MailboxOperations`] owns the forms of one purchase, enforces mailbox
//! uniqueness across them, and fans the remote availability checks out once
//! every form passes local validation.

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info};

use super::cart::CartItem;
use super::form::MailboxForm;
use super::ports::MailboxAvailabilityChecker;

/// Errors raised when assembling a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationsError {
    /// Two forms carry the same opaque id.
    #[error("form id `{uuid}` appears more than once in the batch")]
    DuplicateFormId {
        /// Repeated id.
        uuid: String,
    },
}

/// Ordered forms of one batch plus the availability port they share.
///
/// ## Invariants
/// - Form ids are unique within the batch.
pub struct MailboxOperations {
    forms: Vec<MailboxForm>,
    checker: Arc<dyn MailboxAvailabilityChecker>,
}

impl MailboxOperations {
    /// Build a coordinator over `forms`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::DuplicateFormId`] when two forms share an
    /// opaque id.
    pub fn new(
        forms: Vec<MailboxForm>,
        checker: Arc<dyn MailboxAvailabilityChecker>,
    ) -> Result<Self, OperationsError> {
        let mut operations = Self {
            forms: Vec::with_capacity(forms.len()),
            checker,
        };
        for form in forms {
            operations.push(form)?;
        }
        Ok(operations)
    }

    /// Forms in batch order.
    pub fn forms(&self) -> &[MailboxForm] {
        &self.forms
    }

    /// Mutable forms in batch order.
    pub fn forms_mut(&mut self) -> &mut [MailboxForm] {
        &mut self.forms
    }

    /// Append a form to the batch.
    ///
    /// # Errors
    ///
    /// Returns [`OperationsError::DuplicateFormId`] when a form with the same
    /// opaque id is already part of the batch; the batch is left unchanged.
    pub fn push(&mut self, form: MailboxForm) -> Result<(), OperationsError> {
        if self.forms.iter().any(|other| other.uuid() == form.uuid()) {
            return Err(OperationsError::DuplicateFormId {
                uuid: form.uuid().to_owned(),
            });
        }
        self.forms.push(form);
        Ok(())
    }

    /// Remove the form with the given opaque id, returning it.
    pub fn remove(&mut self, uuid: &str) -> Option<MailboxForm> {
        let index = self.forms.iter().position(|form| form.uuid() == uuid)?;
        Some(self.forms.remove(index))
    }

    /// Run local validation on every form.
    ///
    /// Each form is also checked against the mailboxes of the forms before
    /// it in the batch, so the later of two equal mailboxes is flagged. The
    /// comparison set is recorded on the form and reused when a single field
    /// is revalidated.
    pub fn validate_local(&mut self) {
        for index in 0..self.forms.len() {
            let (earlier, rest) = self.forms.split_at_mut(index);
            let Some(form) = rest.first_mut() else {
                continue;
            };
            let previous: Vec<String> = earlier
                .iter()
                .map(|other| other.mailbox_name().to_owned())
                .filter(|name| !name.is_empty())
                .collect();
            form.validate_with_previous(&previous);
        }
    }

    /// Whether every form may be submitted.
    pub fn is_valid(&self) -> bool {
        self.forms.iter().all(MailboxForm::is_valid)
    }

    /// Validate the batch, consulting the availability port when needed.
    ///
    /// Remote checks only run for extra purchases and only once every form
    /// passes local validation. Check failures end up as field errors; this
    /// method never fails.
    pub async fn validate_and_check(&mut self, is_extra_purchase: bool) -> bool {
        self.validate_local();
        if !self.is_valid() {
            debug!(forms = self.forms.len(), "batch failed local validation");
            return false;
        }
        if !is_extra_purchase {
            return true;
        }

        let checker = Arc::clone(&self.checker);
        join_all(
            self.forms
                .iter_mut()
                .map(|form| form.validate_on_demand(checker.as_ref())),
        )
        .await;

        let valid = self.is_valid();
        info!(
            forms = self.forms.len(),
            valid, "batch availability checks settled"
        );
        valid
    }

    /// Checkout items for every form, in batch order.
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.forms.iter().map(MailboxForm::as_cart_item).collect()
    }
}

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;
