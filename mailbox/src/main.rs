//! `mailbox-check` entry-point: validates a JSON batch of mailbox forms and
//! prints a JSON report, exiting non-zero when any form is invalid.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use mailbox_forms::config::MailboxCheckSettings;
use mailbox_forms::inbound::cli::{BatchFile, BatchReport};
use mailbox_forms::outbound::availability::{HttpAvailabilityChecker, HttpAvailabilityIdentity};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = MailboxCheckSettings::from_args(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let batch_path = settings.batch_path.clone().ok_or_else(|| {
        eyre!("no batch file given; set --batch-path or MAILBOX_CHECK_BATCH_PATH")
    })?;

    let base_url = Url::parse(settings.availability_base_url())
        .wrap_err("invalid availability base URL")?;
    let checker = HttpAvailabilityChecker::with_identity(
        base_url,
        settings.availability_timeout(),
        HttpAvailabilityIdentity {
            user_agent: settings.user_agent().to_owned(),
        },
    )
    .wrap_err("failed to build availability client")?;

    let mut operations = BatchFile::from_path(&batch_path)?.into_operations(Arc::new(checker))?;
    let valid = operations.validate_and_check(settings.extra_purchase).await;
    info!(
        path = %batch_path.display(),
        forms = operations.forms().len(),
        valid,
        "batch checked"
    );

    let report = serde_json::to_string_pretty(&BatchReport::from(&operations))?;
    writeln!(std::io::stdout().lock(), "{report}")?;

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
