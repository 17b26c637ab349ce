//! Settings loading through the public API used by `mailbox-check`.
//!
//! Only the inherent loader is imported here, so these tests fail to build
//! if the binary's loading path ever needs a trait import again.

use std::path::PathBuf;
use std::time::Duration;

use env_lock::lock_env;
use mailbox_forms::config::MailboxCheckSettings;
use rstest::rstest;

const VARS: [&str; 5] = [
    "MAILBOX_CHECK_BATCH_PATH",
    "MAILBOX_CHECK_AVAILABILITY_BASE_URL",
    "MAILBOX_CHECK_AVAILABILITY_TIMEOUT_SECS",
    "MAILBOX_CHECK_EXTRA_PURCHASE",
    "MAILBOX_CHECK_USER_AGENT",
];

#[rstest]
fn command_line_flags_configure_the_run() {
    let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

    let settings = MailboxCheckSettings::from_args([
        "mailbox-check",
        "--batch-path",
        "batch.json",
        "--availability-timeout-secs",
        "4",
    ])
    .expect("flags parse");

    assert_eq!(settings.batch_path, Some(PathBuf::from("batch.json")));
    assert_eq!(settings.availability_timeout(), Duration::from_secs(4));
    assert!(!settings.extra_purchase);
}

#[rstest]
fn environment_fills_in_missing_flags() {
    let _guard = lock_env([
        ("MAILBOX_CHECK_BATCH_PATH", Some("/tmp/env-batch.json".to_owned())),
        ("MAILBOX_CHECK_AVAILABILITY_BASE_URL", None),
        ("MAILBOX_CHECK_AVAILABILITY_TIMEOUT_SECS", None),
        ("MAILBOX_CHECK_EXTRA_PURCHASE", Some("true".to_owned())),
        ("MAILBOX_CHECK_USER_AGENT", None),
    ]);

    let settings = MailboxCheckSettings::from_args(std::iter::once("mailbox-check"))
        .expect("environment parses");

    assert_eq!(settings.batch_path, Some(PathBuf::from("/tmp/env-batch.json")));
    assert!(settings.extra_purchase);
}
