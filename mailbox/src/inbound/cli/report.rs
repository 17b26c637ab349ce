//! JSON report written after a batch has been validated.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CartItem, FieldName, MailboxForm, MailboxOperations, Provider};

/// Outcome of validating one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    /// Opaque form identifier.
    pub uuid: String,
    /// Provider hosting the mailbox.
    pub provider: Provider,
    /// Whether the form may be submitted.
    pub valid: bool,
    /// Rendered error per failing field.
    pub errors: BTreeMap<FieldName, String>,
    /// Checkout item; present only for valid forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_item: Option<CartItem>,
}

impl From<&MailboxForm> for FormReport {
    fn from(form: &MailboxForm) -> Self {
        let valid = form.is_valid();
        Self {
            uuid: form.uuid().to_owned(),
            provider: form.provider(),
            valid,
            errors: form
                .fields()
                .filter_map(|field| field.error().map(|error| (field.name(), error.to_string())))
                .collect(),
            cart_item: valid.then(|| form.as_cart_item()),
        }
    }
}

/// Outcome of validating a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Whether every form may be submitted.
    pub valid: bool,
    /// Per-form outcomes in batch order.
    pub forms: Vec<FormReport>,
}

impl From<&MailboxOperations> for BatchReport {
    fn from(operations: &MailboxOperations) -> Self {
        Self {
            valid: operations.is_valid(),
            forms: operations.forms().iter().map(FormReport::from).collect(),
        }
    }
}
