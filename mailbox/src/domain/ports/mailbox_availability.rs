//! Driven port for remote mailbox availability checks.
//!
//! The domain owns the query and answer shapes so the availability validator
//! stays independent of the HTTP adapter.

use async_trait::async_trait;

use super::define_port_error;

/// Message used when the service rejects a mailbox without explaining why.
pub const DEFAULT_UNAVAILABLE_MESSAGE: &str = "This mailbox is not available.";

/// Mailbox candidate sent to the availability service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Domain the mailbox would be created under.
    pub domain: String,
    /// Candidate local part.
    pub mailbox: String,
}

impl AvailabilityQuery {
    /// Build a query, trimming both parts.
    pub fn new(domain: impl AsRef<str>, mailbox: impl AsRef<str>) -> Self {
        Self {
            domain: domain.as_ref().trim().to_owned(),
            mailbox: mailbox.as_ref().trim().to_owned(),
        }
    }
}

/// Answer returned by the availability service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxAvailability {
    /// The mailbox can be created.
    Available,
    /// The mailbox cannot be created.
    Unavailable {
        /// Message to show the user verbatim.
        message: String,
    },
}

impl MailboxAvailability {
    /// Unavailable answer; blank messages fall back to a generic one.
    pub fn unavailable(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Unavailable {
                message: DEFAULT_UNAVAILABLE_MESSAGE.to_owned(),
            };
        }
        Self::Unavailable { message }
    }
}

define_port_error! {
    /// Errors raised before the availability service produced an answer.
    pub enum MailboxAvailabilityError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "availability transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "availability check timed out: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "availability response decode failed: {message}",
        /// The adapter rejected the query before sending it.
        InvalidRequest { message: String } =>
            "availability request invalid: {message}",
    }
}

/// Port for asking whether a mailbox can be created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxAvailabilityChecker: Send + Sync {
    /// Ask whether `query.mailbox` can be created on `query.domain`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use mailbox_forms::domain::ports::{
    ///     AvailabilityQuery, FixtureAvailabilityChecker, MailboxAvailability,
    ///     MailboxAvailabilityChecker,
    /// };
    ///
    /// let checker = FixtureAvailabilityChecker;
    /// let answer = checker
    ///     .check(&AvailabilityQuery::new("example.com", "john.doe"))
    ///     .await?;
    /// assert_eq!(answer, MailboxAvailability::Available);
    /// # Ok::<(), mailbox_forms::domain::ports::MailboxAvailabilityError>(())
    /// ```
    async fn check(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<MailboxAvailability, MailboxAvailabilityError>;
}

/// Fixture checker reporting every mailbox as available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAvailabilityChecker;

#[async_trait]
impl MailboxAvailabilityChecker for FixtureAvailabilityChecker {
    async fn check(
        &self,
        _query: &AvailabilityQuery,
    ) -> Result<MailboxAvailability, MailboxAvailabilityError> {
        Ok(MailboxAvailability::Available)
    }
}
