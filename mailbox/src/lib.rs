//! Mailbox creation form validation engine.
//!
//! Hexagonal layout: [`domain`] holds the field model, validators, form
//! aggregate and batch coordinator; [`outbound`] adapts the availability
//! port to HTTP; [`inbound`] reads batch files for the `mailbox-check`
//! binary, configured through [`config`].

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
