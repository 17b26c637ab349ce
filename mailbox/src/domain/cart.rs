//! Checkout projection of a mailbox form.
//!
//! The shopping cart consumes these items as JSON; the key names are part of
//! that contract and differ per provider.

use serde::Serialize;

/// Mailbox entry handed to the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CartItem {
    /// Titan mailbox.
    Titan(TitanCartItem),
    /// Google Workspace user.
    GoogleWorkspace(GoogleWorkspaceCartItem),
}

/// Titan mailbox purchase entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitanCartItem {
    /// Full mailbox address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Owner display name.
    pub name: String,
    /// Whether the owner administers the domain's email.
    pub is_admin: bool,
    /// Recovery address, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_email: Option<String>,
}

/// Google Workspace user purchase entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleWorkspaceCartItem {
    /// Full mailbox address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// User first name.
    pub firstname: String,
    /// User last name.
    pub lastname: String,
    /// Recovery address, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
}

/// Build `mailbox@domain` the way the checkout flow expects it.
pub fn mailbox_address(mailbox: &str, domain: &str) -> String {
    format!(
        "{}@{}",
        mailbox.trim().to_lowercase(),
        domain.trim().to_lowercase()
    )
}

/// `Some(trimmed)` for non-blank input.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
