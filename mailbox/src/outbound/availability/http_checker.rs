//! Reqwest-backed mailbox availability adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP status mapping, and JSON decoding of the service message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::AvailabilityResponseDto;
use crate::domain::ports::{
    AvailabilityQuery, MailboxAvailability, MailboxAvailabilityChecker, MailboxAvailabilityError,
};

const DEFAULT_USER_AGENT: &str = "mailbox-forms/0.1";

/// Outbound identity sent with availability requests.
pub struct HttpAvailabilityIdentity {
    /// HTTP user-agent header value.
    pub user_agent: String,
}

impl Default for HttpAvailabilityIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Availability adapter issuing one HTTP GET per query against a base URL.
pub struct HttpAvailabilityChecker {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpAvailabilityChecker {
    /// Build an adapter using a reqwest client with an explicit timeout.
    /// ```rust,ignore
    /// let checker = HttpAvailabilityChecker::new(base_url, Duration::from_secs(10));
    /// assert!(checker.is_ok() || checker.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, HttpAvailabilityIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    /// ```rust,ignore
    /// let checker = HttpAvailabilityChecker::with_identity(base_url, timeout, identity);
    /// assert!(checker.is_ok() || checker.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: HttpAvailabilityIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            user_agent: identity.user_agent,
        })
    }
}

#[async_trait]
impl MailboxAvailabilityChecker for HttpAvailabilityChecker {
    async fn check(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<MailboxAvailability, MailboxAvailabilityError> {
        let url = availability_url(&self.base_url, query)?;
        debug!(domain = %query.domain, "checking mailbox availability");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok(map_response(status, body.as_ref()))
    }
}

fn availability_url(
    base_url: &Url,
    query: &AvailabilityQuery,
) -> Result<Url, MailboxAvailabilityError> {
    if query.domain.is_empty() || query.mailbox.is_empty() {
        return Err(MailboxAvailabilityError::invalid_request(
            "domain and mailbox must not be blank",
        ));
    }

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            MailboxAvailabilityError::invalid_request(format!(
                "base URL `{base_url}` cannot carry a path"
            ))
        })?
        .pop_if_empty()
        .extend([
            "emails",
            "titan",
            query.domain.as_str(),
            "check-mailbox-availability",
            query.mailbox.as_str(),
        ]);
    Ok(url)
}

fn map_response(status: StatusCode, body: &[u8]) -> MailboxAvailability {
    if status == StatusCode::OK {
        return MailboxAvailability::Available;
    }

    let message = AvailabilityResponseDto::from_body(body)
        .into_message()
        .unwrap_or_else(|| {
            let preview = body_preview(body);
            if preview.is_empty() || preview.starts_with('{') {
                format!("Mailbox availability check failed with status {}.", status.as_u16())
            } else {
                preview
            }
        });
    MailboxAvailability::unavailable(message)
}

fn map_transport_error(error: reqwest::Error) -> MailboxAvailabilityError {
    if error.is_timeout() {
        MailboxAvailabilityError::timeout(error.to_string())
    } else if error.is_decode() {
        MailboxAvailabilityError::decode(error.to_string())
    } else {
        MailboxAvailabilityError::transport(error.to_string())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
