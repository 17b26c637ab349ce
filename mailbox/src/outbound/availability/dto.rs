//! DTOs for decoding availability endpoint responses.

use serde::Deserialize;

/// Body returned by the availability endpoint, for both answers and errors.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AvailabilityResponseDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl AvailabilityResponseDto {
    /// Decode a body, treating anything undecodable as message-less.
    pub(super) fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Message carried by the body, unchanged, when it is not blank.
    pub(super) fn into_message(self) -> Option<String> {
        self.message.filter(|message| !message.trim().is_empty())
    }
}
