//! Inbound adapters that translate external input into domain calls while
//! keeping file formats and process concerns at the edge.
//!
//! The batch command-line surface lives under [`cli`].

pub mod cli;
