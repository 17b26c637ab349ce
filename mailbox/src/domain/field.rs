//! Form field model.
//!
//! A [`Field`] is one editable attribute of a mailbox creation form. Fields
//! are created by the field-set factory and mutated by the owning form; the
//! rendering layer reads them back through snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a form field.
///
/// The serialised form is the camelCase key used by batch files and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    /// Opaque identifier of the form within a batch.
    Uuid,
    /// Domain the mailbox is created under.
    Domain,
    /// Mailbox local part.
    Mailbox,
    /// Initial mailbox password.
    Password,
    /// Recovery address used to reset the mailbox password.
    PasswordResetEmail,
    /// Account holder first name.
    FirstName,
    /// Account holder last name.
    LastName,
    /// Display name of the mailbox owner.
    Name,
    /// Whether the mailbox owner administers the email domain.
    IsAdmin,
}

impl FieldName {
    /// Stable camelCase key of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Domain => "domain",
            Self::Mailbox => "mailbox",
            Self::Password => "password",
            Self::PasswordResetEmail => "passwordResetEmail",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Name => "name",
            Self::IsAdmin => "isAdmin",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value held by a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text input.
    Text(String),
    /// Checkbox-like input.
    Flag(bool),
}

impl FieldValue {
    /// Text content, or `None` for flags.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Flag(_) => None,
        }
    }

    /// Flag content, or `None` for text.
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Text(_) => None,
            Self::Flag(flag) => Some(*flag),
        }
    }

    /// Blank text counts as empty; flags are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Flag(_) => false,
        }
    }

    /// Whether `other` holds the same kind of value.
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Text(_), Self::Text(_)) | (Self::Flag(_), Self::Flag(_))
        )
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// User-correctable validation error attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A required field holds no value.
    Required,
    /// The value exceeds the field's character budget.
    TooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// The domain is not a valid host name.
    InvalidDomain,
    /// The mailbox contains characters outside the allowed set.
    InvalidMailboxCharacters {
        /// Whether apostrophes are part of the allowed set.
        apostrophes: bool,
    },
    /// The value, or the address it forms, is not a valid email address.
    InvalidEmail,
    /// The password is shorter than the provider minimum.
    PasswordTooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// The password is longer than the allowed maximum.
    PasswordTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// The password contains non-ASCII characters.
    PasswordNonAscii,
    /// The password starts or ends with a space.
    PasswordSurroundingSpace,
    /// The recovery address lives on the domain being configured.
    SameDomain {
        /// Domain under configuration.
        domain: String,
    },
    /// The mailbox already exists on the domain.
    MailboxExists {
        /// Existing mailbox, in its original casing.
        mailbox: String,
        /// Domain the mailbox lives on.
        domain: String,
    },
    /// Another form in the same batch already uses the mailbox.
    MailboxPreviouslySpecified {
        /// Conflicting mailbox, in its original casing.
        mailbox: String,
    },
    /// The availability service rejected the mailbox.
    MailboxUnavailable {
        /// Message returned by the service.
        message: String,
    },
    /// The availability check failed before producing an answer.
    AvailabilityUnknown,
}

impl FieldError {
    /// Errors produced by the remote availability check rather than local rules.
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::MailboxUnavailable { .. } | Self::AvailabilityUnknown
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required."),
            Self::TooLong { max } => {
                write!(f, "This field can't be longer than {max} characters.")
            }
            Self::InvalidDomain => write!(f, "Please supply a valid domain name."),
            Self::InvalidMailboxCharacters { apostrophes: true } => write!(
                f,
                "Please use only letters, numbers, periods, apostrophes ('), hyphens (-), and underscores (_).",
            ),
            Self::InvalidMailboxCharacters { apostrophes: false } => write!(
                f,
                "Please use only letters, numbers, periods, hyphens (-), and underscores (_).",
            ),
            Self::InvalidEmail => write!(f, "Please supply a valid email address."),
            Self::PasswordTooShort { min } => {
                write!(f, "Your password must be at least {min} characters long.")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "Your password can't be longer than {max} characters.")
            }
            Self::PasswordNonAscii => write!(
                f,
                "Your password can only contain letters, numbers, and standard ASCII symbols.",
            ),
            Self::PasswordSurroundingSpace => {
                write!(f, "Your password can't start or end with a blank space.")
            }
            Self::SameDomain { domain } => write!(
                f,
                "This email address must use a different domain than {domain}. Please use a different email address.",
            ),
            Self::MailboxExists { mailbox, domain } => write!(
                f,
                "{mailbox}@{domain} already exists as an email account. Please choose a different mailbox name.",
            ),
            Self::MailboxPreviouslySpecified { mailbox } => write!(
                f,
                "The mailbox {mailbox} is already part of this order. Please use unique mailbox names.",
            ),
            Self::MailboxUnavailable { message } => f.write_str(message),
            Self::AvailabilityUnknown => write!(
                f,
                "An unknown error occurred while checking mailbox availability. Please try again.",
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// One editable attribute of a mailbox creation form.
///
/// ## Invariants
/// - `error` is never an error whose rendered message is blank.
/// - `value` keeps the kind (text or flag) it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: FieldName,
    value: FieldValue,
    error: Option<FieldError>,
    is_required: bool,
    is_touched: bool,
    is_visible: bool,
}

impl Field {
    /// Visible, optional, untouched text field with an empty value.
    pub fn text(name: FieldName) -> Self {
        Self::with_value(name, FieldValue::Text(String::new()))
    }

    /// Visible, optional, untouched checkbox field.
    pub fn flag(name: FieldName, value: bool) -> Self {
        Self::with_value(name, FieldValue::Flag(value))
    }

    const fn with_value(name: FieldName, value: FieldValue) -> Self {
        Self {
            name,
            value,
            error: None,
            is_required: false,
            is_touched: false,
            is_visible: true,
        }
    }

    /// Builder: mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Builder: hide the field.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    /// Builder: seed the field value.
    #[must_use]
    pub fn prefilled(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Field identifier.
    pub const fn name(&self) -> FieldName {
        self.name
    }

    /// Current value.
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Current text value, or `""` for flags.
    pub fn text_value(&self) -> &str {
        self.value.as_text().unwrap_or_default()
    }

    /// Replace the value, returning whether it changed.
    pub fn set_value(&mut self, value: FieldValue) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Whether the value is blank.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Current validation error.
    pub const fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Set or clear the validation error.
    ///
    /// Errors that render to a blank message are stored as `None`.
    pub fn set_error(&mut self, error: Option<FieldError>) {
        self.error = error.filter(|error| !error.to_string().trim().is_empty());
    }

    /// Remove the validation error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether a validation error is present.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the field must hold a value when visible.
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    /// Update the required flag.
    pub fn set_required(&mut self, is_required: bool) {
        self.is_required = is_required;
    }

    /// Whether the user has interacted with the field.
    pub const fn is_touched(&self) -> bool {
        self.is_touched
    }

    /// Update the touched flag.
    pub fn set_touched(&mut self, is_touched: bool) {
        self.is_touched = is_touched;
    }

    /// Whether the field is shown, and therefore validated.
    pub const fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Update the visibility flag.
    pub fn set_visible(&mut self, is_visible: bool) {
        self.is_visible = is_visible;
    }

    /// Whether the field currently blocks submission on its own.
    pub fn blocks_submission(&self) -> bool {
        self.has_error() || (self.is_required && self.is_visible && self.is_empty())
    }
}
