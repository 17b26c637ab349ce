//! Mailbox hosting providers and their field-set factory.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::{Field, FieldName};

/// Longest password any provider accepts.
pub const PASSWORD_MAX: usize = 100;
/// Shortest password Titan accepts.
pub const TITAN_PASSWORD_MIN: usize = 10;
/// Shortest password Google Workspace accepts.
pub const GOOGLE_WORKSPACE_PASSWORD_MIN: usize = 8;

/// Backend service hosting the mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Titan email.
    #[serde(rename = "titan")]
    Titan,
    /// Google Workspace.
    #[serde(rename = "google")]
    GoogleWorkspace,
}

impl Provider {
    /// Stable key used in batch files and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Titan => "titan",
            Self::GoogleWorkspace => "google",
        }
    }

    /// Minimum password length enforced by the provider.
    pub const fn min_password_length(self) -> usize {
        match self {
            Self::Titan => TITAN_PASSWORD_MIN,
            Self::GoogleWorkspace => GOOGLE_WORKSPACE_PASSWORD_MIN,
        }
    }

    /// Maximum password length enforced by the provider.
    pub const fn max_password_length(self) -> usize {
        PASSWORD_MAX
    }

    /// Whether mailbox names may contain apostrophes.
    pub const fn allows_apostrophes(self) -> bool {
        match self {
            Self::Titan => true,
            Self::GoogleWorkspace => false,
        }
    }

    /// Whether the provider exposes a remote mailbox availability check.
    pub const fn checks_availability(self) -> bool {
        match self {
            Self::Titan => true,
            Self::GoogleWorkspace => false,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, provider-specific set of form fields.
///
/// ## Invariants
/// - Field names are unique.
/// - The shape is fixed by the provider at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    provider: Provider,
    fields: Vec<Field>,
}

impl FieldSet {
    /// Build the fields a provider requires for a mailbox on `domain`.
    ///
    /// # Examples
    /// ```
    /// use mailbox_forms::domain::{FieldName, FieldSet, Provider};
    ///
    /// let set = FieldSet::for_provider(Provider::GoogleWorkspace, "example.com");
    /// assert!(set.get(FieldName::FirstName).is_some());
    /// assert!(set.get(FieldName::IsAdmin).is_none());
    /// ```
    pub fn for_provider(provider: Provider, domain: &str) -> Self {
        let mut fields = vec![
            Field::text(FieldName::Uuid).prefilled(Uuid::new_v4().to_string()),
            Field::text(FieldName::Domain).required().prefilled(domain),
            Field::text(FieldName::Mailbox).required(),
            Field::text(FieldName::Password).required(),
            Field::text(FieldName::PasswordResetEmail).hidden(),
        ];
        match provider {
            Provider::Titan => fields.extend([
                Field::text(FieldName::Name),
                Field::flag(FieldName::IsAdmin, false),
            ]),
            Provider::GoogleWorkspace => fields.extend([
                Field::text(FieldName::FirstName).required(),
                Field::text(FieldName::LastName).required(),
            ]),
        }
        Self { provider, fields }
    }

    /// Provider that shaped this set.
    pub const fn provider(&self) -> Provider {
        self.provider
    }

    /// Look up a field by name.
    pub fn get(&self, name: FieldName) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Look up a field by name for mutation.
    pub fn get_mut(&mut self, name: FieldName) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name() == name)
    }

    /// Fields in their fixed order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Mutable fields in their fixed order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// Field names in their fixed order.
    pub fn names(&self) -> Vec<FieldName> {
        self.fields.iter().map(Field::name).collect()
    }
}
