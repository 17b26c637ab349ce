//! Batch file support for the `mailbox-check` binary.
//!
//! The binary delegates to these types so batch parsing and report building
//! can be exercised in tests without spawning a subprocess.

mod batch;
mod report;

pub use batch::{BatchFile, BatchFileError};
pub use report::{BatchReport, FormReport};
