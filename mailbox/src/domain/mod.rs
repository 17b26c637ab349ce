//! Mailbox form validation domain.
//!
//! Purpose: model the fields of a mailbox creation form, the rules that
//! validate them, and the coordination of several forms submitted as one
//! batch. Nothing here performs I/O directly; the remote availability check
//! goes through [`ports::MailboxAvailabilityChecker`].
//!
//! Public surface:
//! - Field, FieldName, FieldValue, FieldError: the field model.
//! - Provider, FieldSet: provider rules and the field-set factory.
//! - MailboxForm: one mailbox's fields and validation.
//! - MailboxOperations: batch validation and availability fan-out.
//! - CartItem: checkout projection of a form.

pub mod cart;
pub mod field;
pub mod form;
pub mod operations;
pub mod ports;
pub mod provider;
pub mod snapshot;
pub mod validators;

pub use self::cart::{CartItem, GoogleWorkspaceCartItem, TitanCartItem};
pub use self::field::{Field, FieldError, FieldName, FieldValue};
pub use self::form::{AvailabilityRequest, FieldUpdate, FormError, MailboxForm};
pub use self::operations::{MailboxOperations, OperationsError};
pub use self::provider::{FieldSet, Provider};
pub use self::snapshot::{FieldSnapshot, FormSnapshot};
