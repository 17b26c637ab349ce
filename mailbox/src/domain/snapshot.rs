//! Read-only views of form state for rendering and reporting.

use serde::Serialize;

use super::field::{Field, FieldName, FieldValue};
use super::provider::Provider;

/// Serialisable view of one field.
///
/// Password values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSnapshot {
    /// Field identifier.
    pub name: FieldName,
    /// Current value; `None` for secrets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    /// Rendered validation error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the field must hold a value.
    pub is_required: bool,
    /// Whether the user interacted with the field.
    pub is_touched: bool,
    /// Whether the field is shown.
    pub is_visible: bool,
}

impl From<&Field> for FieldSnapshot {
    fn from(field: &Field) -> Self {
        let value = match field.name() {
            FieldName::Password => None,
            _ => Some(field.value().clone()),
        };
        Self {
            name: field.name(),
            value,
            error: field.error().map(ToString::to_string),
            is_required: field.is_required(),
            is_touched: field.is_touched(),
            is_visible: field.is_visible(),
        }
    }
}

/// Serialisable view of one mailbox form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    /// Opaque form identifier.
    pub uuid: String,
    /// Provider shaping the form.
    pub provider: Provider,
    /// Change counter at the time of the snapshot.
    pub revision: u64,
    /// Whether the form may be submitted.
    pub is_valid: bool,
    /// Fields in their fixed order.
    pub fields: Vec<FieldSnapshot>,
}
