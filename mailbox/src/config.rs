//! `mailbox-check` configuration loaded via OrthoConfig.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoResult};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://public-api.wordpress.com/wpcom/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "mailbox-forms/0.1";

/// Settings controlling one batch check run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MAILBOX_CHECK")]
pub struct MailboxCheckSettings {
    /// Path to the JSON batch file.
    pub batch_path: Option<PathBuf>,
    /// Base URL of the availability service.
    pub availability_base_url: Option<String>,
    /// Per-request timeout for availability checks, in seconds.
    pub availability_timeout_secs: Option<u64>,
    /// Treat the batch as an extra purchase, enabling remote checks.
    #[ortho_config(default = false)]
    pub extra_purchase: bool,
    /// User-agent sent to the availability service.
    pub user_agent: Option<String>,
}

impl MailboxCheckSettings {
    /// Load settings from command-line `args`, the environment and
    /// configuration files.
    ///
    /// The first item of `args` is the program name, as with
    /// [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns the OrthoConfig error when a source fails to parse or merge.
    pub fn from_args<I, T>(args: I) -> OrthoResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args)
    }

    /// Return the configured availability base URL, falling back to the
    /// public endpoint.
    pub fn availability_base_url(&self) -> &str {
        self.availability_base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the availability timeout, falling back to ten seconds.
    pub fn availability_timeout(&self) -> Duration {
        Duration::from_secs(
            self.availability_timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Return the configured user-agent, falling back to the crate default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
