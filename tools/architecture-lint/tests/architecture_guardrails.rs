//! Boundary checks over crate trees on disk.

use std::fs;
use std::path::Path;

use architecture_lint::{LintError, check_crate};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Tree {
    root: TempDir,
}

impl Tree {
    fn put(&self, file: &str, text: &str) {
        let path = self.root.path().join("src").join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source directories");
        }
        fs::write(path, text).expect("write source file");
    }

    fn check(&self) -> Result<(), LintError> {
        check_crate(self.root.path())
    }
}

#[fixture]
fn tree() -> Tree {
    let tree = Tree {
        root: TempDir::new().expect("tempdir"),
    };
    tree.put("lib.rs", "pub mod domain; pub mod inbound; pub mod outbound;");
    tree.put(
        "domain/validators/mailbox.rs",
        "use regex::Regex; pub fn re() -> Regex { Regex::new(\"x\").unwrap() }",
    );
    tree.put(
        "domain/ports/mailbox_availability.rs",
        "pub trait MailboxAvailabilityChecker {} pub struct Fixture; impl MailboxAvailabilityChecker for Fixture {}",
    );
    tree.put("inbound/cli/batch.rs", "use crate::domain::ports::Fixture;");
    tree.put(
        "outbound/availability/http_checker.rs",
        "use reqwest::Client; use crate::domain::ports::MailboxAvailabilityChecker; pub struct Http(Client); impl MailboxAvailabilityChecker for Http {}",
    );
    tree.put(
        "main.rs",
        "use mailbox_forms::outbound::availability::Http; fn main() { let _ = color_eyre::install(); }",
    );
    tree
}

#[rstest]
fn layered_tree_passes(tree: Tree) {
    let outcome = tree.check();
    assert!(outcome.is_ok(), "expected success, got: {outcome:?}");
}

#[rstest]
fn nested_files_are_found(tree: Tree) {
    tree.put(
        "inbound/cli/deeper/nested.rs",
        "fn f() { let _ = reqwest::Client::new(); }",
    );
    let Err(LintError::Findings(findings)) = tree.check() else {
        panic!("expected findings");
    };
    assert_eq!(findings.len(), 1, "got: {findings:?}");
    assert_eq!(findings[0].file, Path::new("inbound/cli/deeper/nested.rs"));
    assert_eq!(findings[0].rule, "http-client-in-outbound");
}

#[rstest]
fn sibling_test_files_are_skipped(tree: Tree) {
    tree.put(
        "domain/form_tests.rs",
        "use crate::outbound::availability; struct Stub; impl MailboxAvailabilityChecker for Stub {}",
    );
    let outcome = tree.check();
    assert!(outcome.is_ok(), "expected success, got: {outcome:?}");
}

#[rstest]
fn missing_source_directory_is_an_io_error() {
    let root = TempDir::new().expect("tempdir");
    assert!(matches!(
        check_crate(root.path()),
        Err(LintError::Io { .. })
    ));
}

#[rstest]
fn mailbox_crate_respects_its_boundaries() {
    let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../mailbox");
    let outcome = check_crate(&crate_dir);
    assert!(outcome.is_ok(), "mailbox sources break boundaries: {outcome:?}");
}
