//! Mailbox availability outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `MailboxAvailabilityChecker` port.

mod dto;
mod http_checker;

pub use http_checker::{HttpAvailabilityChecker, HttpAvailabilityIdentity};
