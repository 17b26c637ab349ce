//! Mailbox name rules.

use std::sync::OnceLock;

use regex::Regex;

use super::FieldValidator;
use super::email::is_valid_email;
use crate::domain::field::{Field, FieldError};

static MAILBOX_RE: OnceLock<Regex> = OnceLock::new();
static MAILBOX_WITH_APOSTROPHES_RE: OnceLock<Regex> = OnceLock::new();

// Mailbox names are ASCII only, so the classes are spelled out instead of
// using `\d` or `(?i)`, which match Unicode digits and case folds.
fn mailbox_regex(apostrophes: bool) -> &'static Regex {
    let (cell, pattern) = if apostrophes {
        (
            &MAILBOX_WITH_APOSTROPHES_RE,
            r"^[0-9A-Za-z_'-](?:\.?[0-9A-Za-z_'-])*$",
        )
    } else {
        (&MAILBOX_RE, r"^[0-9A-Za-z_-](?:\.?[0-9A-Za-z_-])*$")
    };
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("mailbox regex failed to compile: {error}"))
    })
}

/// Restricts mailbox names to the provider's character set.
#[derive(Debug, Clone, Copy)]
pub struct MailboxNameValidator {
    apostrophes: bool,
}

impl MailboxNameValidator {
    /// Build a validator; `apostrophes` widens the allowed set with `'`.
    pub const fn new(apostrophes: bool) -> Self {
        Self { apostrophes }
    }
}

impl FieldValidator for MailboxNameValidator {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let mailbox = field.text_value().trim();
        if mailbox.is_empty() || mailbox_regex(self.apostrophes).is_match(mailbox) {
            return Ok(());
        }
        Err(FieldError::InvalidMailboxCharacters {
            apostrophes: self.apostrophes,
        })
    }
}

/// Requires `mailbox@domain` to be a valid email address.
///
/// Skipped while the domain itself is invalid so the domain error is the one
/// the user sees.
#[derive(Debug, Clone, Copy)]
pub struct MailboxValidAsEmailValidator<'a> {
    domain: &'a str,
    domain_has_error: bool,
}

impl<'a> MailboxValidAsEmailValidator<'a> {
    /// Build a validator for mailboxes on `domain`.
    pub const fn new(domain: &'a str, domain_has_error: bool) -> Self {
        Self {
            domain,
            domain_has_error,
        }
    }
}

impl FieldValidator for MailboxValidAsEmailValidator<'_> {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let mailbox = field.text_value().trim();
        if self.domain_has_error || mailbox.is_empty() {
            return Ok(());
        }
        if is_valid_email(&format!("{mailbox}@{}", self.domain.trim())) {
            return Ok(());
        }
        Err(FieldError::InvalidEmail)
    }
}

fn find_case_insensitive<'n>(names: &'n [String], mailbox: &str) -> Option<&'n String> {
    names
        .iter()
        .find(|name| name.trim().to_lowercase() == mailbox.to_lowercase())
}

/// Rejects mailboxes that already exist on the domain.
#[derive(Debug, Clone, Copy)]
pub struct ExistingMailboxValidator<'a> {
    domain: &'a str,
    existing: &'a [String],
}

impl<'a> ExistingMailboxValidator<'a> {
    /// Build a validator against accounts already present on `domain`.
    pub const fn new(domain: &'a str, existing: &'a [String]) -> Self {
        Self { domain, existing }
    }
}

impl FieldValidator for ExistingMailboxValidator<'_> {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let mailbox = field.text_value().trim();
        if mailbox.is_empty() {
            return Ok(());
        }
        match find_case_insensitive(self.existing, mailbox) {
            Some(existing) => Err(FieldError::MailboxExists {
                mailbox: existing.trim().to_owned(),
                domain: self.domain.trim().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/// Rejects mailboxes already claimed by other forms of the same batch.
#[derive(Debug, Clone, Copy)]
pub struct PreviouslySpecifiedMailboxValidator<'a> {
    previous: &'a [String],
}

impl<'a> PreviouslySpecifiedMailboxValidator<'a> {
    /// Build a validator against the names claimed earlier in the batch.
    pub const fn new(previous: &'a [String]) -> Self {
        Self { previous }
    }
}

impl FieldValidator for PreviouslySpecifiedMailboxValidator<'_> {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let mailbox = field.text_value().trim();
        if mailbox.is_empty() {
            return Ok(());
        }
        match find_case_insensitive(self.previous, mailbox) {
            Some(previous) => Err(FieldError::MailboxPreviouslySpecified {
                mailbox: previous.trim().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldName;
    use rstest::rstest;

    fn mailbox(value: &str) -> Field {
        Field::text(FieldName::Mailbox).required().prefilled(value)
    }

    #[rstest]
    #[case("john.doe", false, true)]
    #[case("John_Doe-2", false, true)]
    #[case("o'brien", false, false)]
    #[case("o'brien", true, true)]
    #[case("john..doe", true, false)]
    #[case(".john", true, false)]
    #[case("john.", true, false)]
    #[case("jöhn", true, false)]
    #[case("john doe", true, false)]
    #[case("\u{663}\u{664}", true, false)]
    #[case("\u{17F}ales", true, false)]
    #[case("\u{212A}ate", false, false)]
    #[case("JOHN.DOE", false, true)]
    fn charset_depends_on_apostrophe_support(
        #[case] value: &str,
        #[case] apostrophes: bool,
        #[case] valid: bool,
    ) {
        let result = MailboxNameValidator::new(apostrophes).validate(&mailbox(value));
        assert_eq!(result.is_ok(), valid, "{value} (apostrophes: {apostrophes})");
        if !valid {
            assert_eq!(
                result,
                Err(FieldError::InvalidMailboxCharacters { apostrophes })
            );
        }
    }

    #[rstest]
    fn mailbox_must_form_a_valid_address() {
        let validator = MailboxValidAsEmailValidator::new("example.com", false);
        assert_eq!(validator.validate(&mailbox("john.doe")), Ok(()));

        let broken_domain = MailboxValidAsEmailValidator::new("not a domain", false);
        assert_eq!(
            broken_domain.validate(&mailbox("john.doe")),
            Err(FieldError::InvalidEmail)
        );
    }

    #[rstest]
    fn address_check_defers_to_domain_error() {
        let validator = MailboxValidAsEmailValidator::new("not a domain", true);
        assert_eq!(validator.validate(&mailbox("john.doe")), Ok(()));
    }

    #[rstest]
    fn existing_mailbox_reports_original_casing() {
        let existing = vec!["Sales".to_owned(), "info".to_owned()];
        let validator = ExistingMailboxValidator::new("example.com", &existing);
        assert_eq!(
            validator.validate(&mailbox("sALES")),
            Err(FieldError::MailboxExists {
                mailbox: "Sales".to_owned(),
                domain: "example.com".to_owned(),
            })
        );
        assert_eq!(validator.validate(&mailbox("support")), Ok(()));
    }

    #[rstest]
    fn previously_specified_mailbox_reports_original_casing() {
        let previous = vec!["John.Doe".to_owned()];
        let validator = PreviouslySpecifiedMailboxValidator::new(&previous);
        assert_eq!(
            validator.validate(&mailbox("john.doe")),
            Err(FieldError::MailboxPreviouslySpecified {
                mailbox: "John.Doe".to_owned(),
            })
        );
    }

    #[rstest]
    fn blank_mailbox_is_left_to_the_required_rule() {
        let previous = vec![String::new()];
        let validator = PreviouslySpecifiedMailboxValidator::new(&previous);
        assert_eq!(validator.validate(&mailbox("  ")), Ok(()));
    }
}
