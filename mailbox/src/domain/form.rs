//! Mailbox form aggregate.
//!
//! A [`MailboxForm`] owns the provider-specific fields of one mailbox being
//! created and runs the validator pipeline over them. Mutations return a
//! [`FieldUpdate`] instead of calling back into the rendering layer, so the
//! host decides when to re-render.

use thiserror::Error;
use tracing::debug;

use super::cart::{CartItem, GoogleWorkspaceCartItem, TitanCartItem, mailbox_address, non_blank};
use super::field::{Field, FieldError, FieldName, FieldValue};
use super::ports::{AvailabilityQuery, MailboxAvailabilityChecker};
use super::provider::{FieldSet, Provider};
use super::snapshot::{FieldSnapshot, FormSnapshot};
use super::validators::{
    DomainNameValidator, EMAIL_MAX, ExistingMailboxValidator, MAILBOX_MAX,
    MailboxAvailabilityValidator, MailboxNameValidator, MailboxValidAsEmailValidator,
    MaximumLengthValidator, NAME_MAX, PasswordResetEmailValidator, PasswordValidator,
    PreviouslySpecifiedMailboxValidator, RequiredValidator, run_validators,
};

/// Errors raised when addressing fields a form does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The provider's field set has no such field.
    #[error("{provider} mailbox forms have no `{field}` field")]
    FieldNotInForm {
        /// Provider of the form.
        provider: Provider,
        /// Requested field.
        field: FieldName,
    },
    /// The value kind does not match the field (text vs flag).
    #[error("`{field}` does not accept this kind of value")]
    ValueKindMismatch {
        /// Target field.
        field: FieldName,
    },
}

/// Outcome of a field write, used by hosts to decide whether to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUpdate {
    /// Field that was written.
    pub field: FieldName,
    /// Whether the value differs from the previous one.
    pub changed: bool,
    /// Form revision after the write.
    pub revision: u64,
}

/// In-flight availability check captured from a form.
///
/// Hosts that cannot hold the form across the network call take a request,
/// run it, and hand the answer back through
/// [`MailboxForm::apply_availability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    /// Form revision when the request was taken.
    pub revision: u64,
    /// Query sent to the availability port.
    pub query: AvailabilityQuery,
}

/// Fields and validation state of one mailbox being created.
#[derive(Debug, Clone)]
pub struct MailboxForm {
    fields: FieldSet,
    existing_mailboxes: Vec<String>,
    claimed_elsewhere: Vec<String>,
    revision: u64,
}

impl MailboxForm {
    /// Build an empty form for a mailbox on `domain`.
    ///
    /// # Examples
    /// ```
    /// use mailbox_forms::domain::{FieldName, MailboxForm, Provider};
    ///
    /// let mut form = MailboxForm::new(Provider::Titan, "example.com");
    /// form.set_field_value(FieldName::Mailbox, "john.doe")?;
    /// form.set_field_value(FieldName::Password, "Sh0rtPW")?;
    /// form.validate();
    /// assert!(!form.is_valid());
    /// # Ok::<(), mailbox_forms::domain::FormError>(())
    /// ```
    pub fn new(provider: Provider, domain: &str) -> Self {
        Self {
            fields: FieldSet::for_provider(provider, domain),
            existing_mailboxes: Vec::new(),
            claimed_elsewhere: Vec::new(),
            revision: 0,
        }
    }

    /// Builder: mailboxes that already exist on the domain.
    #[must_use]
    pub fn with_existing_mailboxes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.existing_mailboxes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Provider shaping the form.
    pub const fn provider(&self) -> Provider {
        self.fields.provider()
    }

    /// Change counter, bumped on every value change.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Opaque identifier of the form.
    pub fn uuid(&self) -> &str {
        self.text(FieldName::Uuid)
    }

    /// Domain currently configured on the form.
    pub fn domain(&self) -> &str {
        self.text(FieldName::Domain).trim()
    }

    /// Mailbox local part currently entered.
    pub fn mailbox_name(&self) -> &str {
        self.text(FieldName::Mailbox).trim()
    }

    /// Mailboxes already present on the domain.
    pub fn existing_mailboxes(&self) -> &[String] {
        &self.existing_mailboxes
    }

    fn text(&self, name: FieldName) -> &str {
        self.fields.get(name).map_or("", Field::text_value)
    }

    fn field_mut(&mut self, name: FieldName) -> Result<&mut Field, FormError> {
        let provider = self.provider();
        self.fields
            .get_mut(name)
            .ok_or(FormError::FieldNotInForm {
                provider,
                field: name,
            })
    }

    /// Look up a field.
    pub fn field(&self, name: FieldName) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in their fixed order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Current value of a field.
    pub fn field_value(&self, name: FieldName) -> Option<&FieldValue> {
        self.fields.get(name).map(Field::value)
    }

    /// Current error of a field.
    pub fn field_error(&self, name: FieldName) -> Option<&FieldError> {
        self.fields.get(name).and_then(Field::error)
    }

    /// Write a field value.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when the field is not part of this provider's
    /// form or the value kind does not match.
    pub fn set_field_value(
        &mut self,
        name: FieldName,
        value: impl Into<FieldValue>,
    ) -> Result<FieldUpdate, FormError> {
        let value = value.into();
        let field = self.field_mut(name)?;
        if !field.value().same_kind(&value) {
            return Err(FormError::ValueKindMismatch { field: name });
        }
        let changed = field.set_value(value);
        if changed {
            self.revision += 1;
        }
        Ok(FieldUpdate {
            field: name,
            changed,
            revision: self.revision,
        })
    }

    /// Mark a field as touched or untouched.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotInForm`] for unknown fields.
    pub fn set_field_touched(&mut self, name: FieldName, touched: bool) -> Result<(), FormError> {
        self.field_mut(name)?.set_touched(touched);
        Ok(())
    }

    /// Show or hide a field. Hidden fields are not validated.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotInForm`] for unknown fields.
    pub fn set_field_visible(&mut self, name: FieldName, visible: bool) -> Result<(), FormError> {
        let field = self.field_mut(name)?;
        field.set_visible(visible);
        if !visible {
            field.clear_error();
        }
        Ok(())
    }

    /// Make a field required or optional.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotInForm`] for unknown fields.
    pub fn set_field_required(&mut self, name: FieldName, required: bool) -> Result<(), FormError> {
        self.field_mut(name)?.set_required(required);
        Ok(())
    }

    /// Remove every field error.
    pub fn clear_errors(&mut self) {
        self.fields.iter_mut().for_each(Field::clear_error);
    }

    /// Whether any field carries an error.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(Field::has_error)
    }

    /// Mailbox names claimed by earlier forms of the batch, as recorded by
    /// the last [`MailboxForm::validate_with_previous`].
    pub fn claimed_elsewhere(&self) -> &[String] {
        &self.claimed_elsewhere
    }

    /// Clear all errors and run every synchronous validator.
    ///
    /// The mailbox is still checked against the names recorded by the last
    /// [`MailboxForm::validate_with_previous`].
    pub fn validate(&mut self) {
        self.clear_errors();
        for name in self.fields.names() {
            self.run_field_validators(name);
        }
        debug!(
            provider = %self.provider(),
            uuid = %self.uuid(),
            errors = self.fields.iter().filter(|field| field.has_error()).count(),
            "validated mailbox form"
        );
    }

    /// Record the names claimed by other forms of the batch, then
    /// [`MailboxForm::validate`].
    pub fn validate_with_previous(&mut self, previous: &[String]) {
        self.claimed_elsewhere = previous.to_vec();
        self.validate();
    }

    /// Re-run the validators of one field, typically on blur.
    pub fn validate_field(&mut self, name: FieldName) -> Option<&FieldError> {
        if let Some(field) = self.fields.get_mut(name) {
            field.clear_error();
        }
        self.run_field_validators(name);
        self.field_error(name)
    }

    fn run_field_validators(&mut self, name: FieldName) {
        let provider = self.provider();
        let domain = self.domain().to_owned();
        let domain_has_error = self
            .fields
            .get(FieldName::Domain)
            .is_some_and(Field::has_error);
        let existing = &self.existing_mailboxes;
        let previous = &self.claimed_elsewhere;
        let Some(field) = self.fields.get_mut(name) else {
            return;
        };
        if !field.is_visible() {
            return;
        }

        match name {
            FieldName::Uuid | FieldName::IsAdmin => {}
            FieldName::Domain => run_validators(field, &[&RequiredValidator, &DomainNameValidator]),
            FieldName::Mailbox => run_validators(
                field,
                &[
                    &RequiredValidator,
                    &MaximumLengthValidator::new(MAILBOX_MAX),
                    &MailboxNameValidator::new(provider.allows_apostrophes()),
                    &MailboxValidAsEmailValidator::new(&domain, domain_has_error),
                    &ExistingMailboxValidator::new(&domain, existing),
                    &PreviouslySpecifiedMailboxValidator::new(previous),
                ],
            ),
            FieldName::Password => run_validators(
                field,
                &[
                    &RequiredValidator,
                    &PasswordValidator::new(
                        provider.min_password_length(),
                        provider.max_password_length(),
                    ),
                ],
            ),
            FieldName::PasswordResetEmail => run_validators(
                field,
                &[
                    &RequiredValidator,
                    &MaximumLengthValidator::new(EMAIL_MAX),
                    &PasswordResetEmailValidator::new(&domain),
                ],
            ),
            FieldName::FirstName | FieldName::LastName | FieldName::Name => run_validators(
                field,
                &[&RequiredValidator, &MaximumLengthValidator::new(NAME_MAX)],
            ),
        }
    }

    /// Capture the availability check this form currently needs.
    ///
    /// Returns `None` when the provider has no remote check or when the
    /// domain or mailbox is empty or already invalid.
    pub fn availability_request(&self) -> Option<AvailabilityRequest> {
        if !self.provider().checks_availability() {
            return None;
        }
        let domain = self.fields.get(FieldName::Domain)?;
        let mailbox = self.fields.get(FieldName::Mailbox)?;
        if domain.blocks_submission() || domain.is_empty() {
            return None;
        }
        if mailbox.blocks_submission() || mailbox.is_empty() {
            return None;
        }
        Some(AvailabilityRequest {
            revision: self.revision,
            query: AvailabilityQuery::new(self.domain(), self.mailbox_name()),
        })
    }

    /// Record the answer to `request` on the mailbox field.
    ///
    /// Answers for a domain or mailbox that has since been edited are
    /// discarded. Returns whether the answer was applied.
    pub fn apply_availability(
        &mut self,
        request: &AvailabilityRequest,
        outcome: Result<(), FieldError>,
    ) -> bool {
        let current = AvailabilityQuery::new(self.domain(), self.mailbox_name());
        if current != request.query {
            debug!(
                uuid = %self.uuid(),
                requested_revision = request.revision,
                current_revision = self.revision,
                "discarding stale availability answer"
            );
            return false;
        }

        if let (Err(error), Some(field)) = (outcome, self.fields.get_mut(FieldName::Mailbox)) {
            if !field.has_error() {
                field.set_error(Some(error));
            }
        }
        true
    }

    /// Run the remote availability check and record its answer.
    ///
    /// Failures of the check surface as an error on the mailbox field and are
    /// never returned to the caller.
    pub async fn validate_on_demand(&mut self, checker: &dyn MailboxAvailabilityChecker) {
        if let Some(field) = self.fields.get_mut(FieldName::Mailbox) {
            if field.error().is_some_and(FieldError::is_remote) {
                field.clear_error();
            }
        }
        let Some(request) = self.availability_request() else {
            return;
        };
        let outcome = MailboxAvailabilityValidator::new(self.provider(), checker)
            .validate(&request.query)
            .await;
        self.apply_availability(&request, outcome);
    }

    /// Whether no field has an error and every visible required field holds
    /// a value.
    pub fn is_valid(&self) -> bool {
        !self.fields.iter().any(Field::blocks_submission)
    }

    /// Project the form into the item consumed by the checkout flow.
    pub fn as_cart_item(&self) -> CartItem {
        let email = mailbox_address(self.mailbox_name(), self.domain());
        let password = self.text(FieldName::Password).to_owned();
        let reset_email = self
            .fields
            .get(FieldName::PasswordResetEmail)
            .filter(|field| field.is_visible())
            .and_then(|field| non_blank(field.text_value()));

        match self.provider() {
            Provider::Titan => CartItem::Titan(TitanCartItem {
                email,
                password,
                name: self.text(FieldName::Name).trim().to_owned(),
                is_admin: self
                    .field_value(FieldName::IsAdmin)
                    .and_then(FieldValue::as_flag)
                    .unwrap_or(false),
                alternative_email: reset_email,
            }),
            Provider::GoogleWorkspace => CartItem::GoogleWorkspace(GoogleWorkspaceCartItem {
                email,
                password,
                firstname: self.text(FieldName::FirstName).trim().to_owned(),
                lastname: self.text(FieldName::LastName).trim().to_owned(),
                recovery_email: reset_email,
            }),
        }
    }

    /// Serialisable view of the form.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            uuid: self.uuid().to_owned(),
            provider: self.provider(),
            revision: self.revision,
            is_valid: self.is_valid(),
            fields: self.fields.iter().map(FieldSnapshot::from).collect(),
        }
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
