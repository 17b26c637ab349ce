//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod mailbox_availability;

#[cfg(test)]
pub use mailbox_availability::MockMailboxAvailabilityChecker;
pub use mailbox_availability::{
    AvailabilityQuery, DEFAULT_UNAVAILABLE_MESSAGE, FixtureAvailabilityChecker,
    MailboxAvailability, MailboxAvailabilityChecker, MailboxAvailabilityError,
};
