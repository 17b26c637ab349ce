//! Email address and domain name rules.

use std::sync::OnceLock;

use regex::Regex;

use super::FieldValidator;
use crate::domain::field::{Field, FieldError};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Local part per RFC 5322 atoms joined by single dots; host needs a TLD.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
            r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        );
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn domain_regex() -> &'static Regex {
    DOMAIN_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("domain regex failed to compile: {error}"))
    })
}

/// Whether `address` is a syntactically valid email address.
///
/// ```
/// use mailbox_forms::domain::validators::is_valid_email;
///
/// assert!(is_valid_email("john.doe@example.com"));
/// assert!(!is_valid_email("john..doe@example.com"));
/// assert!(!is_valid_email("john@localhost"));
/// ```
pub fn is_valid_email(address: &str) -> bool {
    email_regex().is_match(address)
}

/// Rejects values that are not host names with a top-level domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainNameValidator;

impl FieldValidator for DomainNameValidator {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let domain = field.text_value().trim();
        if domain.is_empty() || domain_regex().is_match(domain) {
            return Ok(());
        }
        Err(FieldError::InvalidDomain)
    }
}

/// Recovery address rule: valid syntax on a different domain.
///
/// The recovery address must not live on the domain being configured.
#[derive(Debug, Clone, Copy)]
pub struct PasswordResetEmailValidator<'a> {
    domain: &'a str,
}

impl<'a> PasswordResetEmailValidator<'a> {
    /// Build a validator for forms configuring `domain`.
    pub const fn new(domain: &'a str) -> Self {
        Self { domain }
    }
}

impl FieldValidator for PasswordResetEmailValidator<'_> {
    fn validate(&self, field: &Field) -> Result<(), FieldError> {
        let address = field.text_value().trim();
        if address.is_empty() {
            return Ok(());
        }
        if !is_valid_email(address) {
            return Err(FieldError::InvalidEmail);
        }

        let configured = self.domain.trim();
        let same_domain = address
            .rsplit_once('@')
            .is_some_and(|(_, host)| host.eq_ignore_ascii_case(configured));
        if same_domain {
            return Err(FieldError::SameDomain {
                domain: configured.to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldName;
    use rstest::rstest;

    fn reset_email(value: &str) -> Field {
        Field::text(FieldName::PasswordResetEmail).prefilled(value)
    }

    #[rstest]
    #[case("john.doe@example.com", true)]
    #[case("o'brien@example.co.uk", true)]
    #[case("first+tag@sub.example.org", true)]
    #[case("plainaddress", false)]
    #[case("@example.com", false)]
    #[case("john@", false)]
    #[case(".john@example.com", false)]
    #[case("john.@example.com", false)]
    #[case("john@-example.com", false)]
    #[case("jo hn@example.com", false)]
    fn email_syntax(#[case] address: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(address), valid, "{address}");
    }

    #[rstest]
    fn rejects_reset_email_on_configured_domain() {
        let validator = PasswordResetEmailValidator::new("example.com");
        assert_eq!(
            validator.validate(&reset_email("localpart@example.com")),
            Err(FieldError::SameDomain {
                domain: "example.com".to_owned()
            })
        );
    }

    #[rstest]
    fn domain_comparison_ignores_case() {
        let validator = PasswordResetEmailValidator::new("Example.COM");
        assert!(matches!(
            validator.validate(&reset_email("someone@example.com")),
            Err(FieldError::SameDomain { .. })
        ));
    }

    #[rstest]
    #[case("someone@gmail.com", Ok(()))]
    #[case("someone@mail.example.com", Ok(()))]
    #[case("not-an-email", Err(FieldError::InvalidEmail))]
    #[case("", Ok(()))]
    fn accepts_addresses_elsewhere(#[case] value: &str, #[case] expected: Result<(), FieldError>) {
        let validator = PasswordResetEmailValidator::new("example.com");
        assert_eq!(validator.validate(&reset_email(value)), expected);
    }

    #[rstest]
    #[case("example.com", Ok(()))]
    #[case("shop.example.co.uk", Ok(()))]
    #[case("localhost", Err(FieldError::InvalidDomain))]
    #[case("exa mple.com", Err(FieldError::InvalidDomain))]
    fn domain_shape(#[case] value: &str, #[case] expected: Result<(), FieldError>) {
        let field = Field::text(FieldName::Domain).prefilled(value);
        assert_eq!(DomainNameValidator.validate(&field), expected);
    }
}
