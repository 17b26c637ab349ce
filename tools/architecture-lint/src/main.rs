//! Runs the boundary checks over `mailbox/`.
//!
//! An optional first argument overrides the crate directory.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let crate_dir = std::env::args_os().nth(1).map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../mailbox"),
        PathBuf::from,
    );

    match architecture_lint::check_crate(&crate_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = write!(io::stderr().lock(), "{err}");
            ExitCode::FAILURE
        }
    }
}
