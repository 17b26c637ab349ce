//! JSON batch file describing mailboxes to create together.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::ports::MailboxAvailabilityChecker;
use crate::domain::{
    FieldName, FieldValue, FormError, MailboxForm, MailboxOperations, OperationsError, Provider,
};

/// Errors raised while reading a batch file.
#[derive(Debug, Error)]
pub enum BatchFileError {
    /// The batch file could not be read.
    #[error("failed to read batch file at '{path}': {message}")]
    Io {
        /// Path to the batch file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// The batch JSON is malformed or has unknown keys.
    #[error("invalid batch JSON: {message}")]
    Json {
        /// Description of the parse error.
        message: String,
    },
    /// A row addresses a field the provider's form lacks.
    #[error("mailbox row {index}: {source}")]
    Row {
        /// Zero-based index of the offending row.
        index: usize,
        /// Underlying form error.
        #[source]
        source: FormError,
    },
    /// Two rows carry the same form id.
    #[error("mailbox rows {first} and {second} share the form id `{uuid}`")]
    DuplicateUuid {
        /// Repeated form id.
        uuid: String,
        /// Zero-based index of the first row using the id.
        first: usize,
        /// Zero-based index of the repeating row.
        second: usize,
    },
    /// The forms could not be assembled into a batch.
    #[error(transparent)]
    Operations(#[from] OperationsError),
}

/// Parsed batch file.
///
/// ```json
/// {
///   "provider": "titan",
///   "domain": "example.com",
///   "existingMailboxes": ["info"],
///   "mailboxes": [{ "mailbox": "john.doe", "password": "LongEnoughPassword1" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchFile {
    /// Provider hosting every mailbox in the batch.
    pub provider: Provider,
    /// Domain the mailboxes are created under.
    pub domain: String,
    /// Mailboxes that already exist on the domain.
    #[serde(default)]
    pub existing_mailboxes: Vec<String>,
    /// One map of field values per mailbox, in batch order.
    pub mailboxes: Vec<BTreeMap<FieldName, FieldValue>>,
}

impl BatchFile {
    /// Read and parse a batch file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BatchFileError::Io`] when the file cannot be read and
    /// [`BatchFileError::Json`] when it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, BatchFileError> {
        let contents = std::fs::read_to_string(path).map_err(|err| BatchFileError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Parse a batch from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`BatchFileError::Json`] when the JSON does not match the
    /// batch shape.
    pub fn from_json(json: &str) -> Result<Self, BatchFileError> {
        serde_json::from_str(json).map_err(|err| BatchFileError::Json {
            message: err.to_string(),
        })
    }

    /// Build one form per row.
    ///
    /// Every supplied field is marked touched. A non-blank
    /// `passwordResetEmail` also becomes visible and required, so it is
    /// validated like any other submitted value.
    ///
    /// # Errors
    ///
    /// Returns [`BatchFileError::Row`] when a row names a field the
    /// provider's form does not have or supplies the wrong kind of value,
    /// and [`BatchFileError::DuplicateUuid`] when two rows share a form id.
    pub fn into_forms(self) -> Result<Vec<MailboxForm>, BatchFileError> {
        let Self {
            provider,
            domain,
            existing_mailboxes,
            mailboxes,
        } = self;

        let mut forms: Vec<MailboxForm> = Vec::with_capacity(mailboxes.len());
        for (index, row) in mailboxes.into_iter().enumerate() {
            let form = build_form(provider, &domain, &existing_mailboxes, row)
                .map_err(|source| BatchFileError::Row { index, source })?;
            if let Some(first) = forms.iter().position(|other| other.uuid() == form.uuid()) {
                return Err(BatchFileError::DuplicateUuid {
                    uuid: form.uuid().to_owned(),
                    first,
                    second: index,
                });
            }
            forms.push(form);
        }
        Ok(forms)
    }

    /// Build the batch coordinator over this file's forms.
    ///
    /// # Errors
    ///
    /// Propagates [`BatchFile::into_forms`] failures.
    pub fn into_operations(
        self,
        checker: Arc<dyn MailboxAvailabilityChecker>,
    ) -> Result<MailboxOperations, BatchFileError> {
        let forms = self.into_forms()?;
        debug!(forms = forms.len(), "batch file loaded");
        Ok(MailboxOperations::new(forms, checker)?)
    }
}

fn build_form(
    provider: Provider,
    domain: &str,
    existing_mailboxes: &[String],
    row: BTreeMap<FieldName, FieldValue>,
) -> Result<MailboxForm, FormError> {
    let mut form =
        MailboxForm::new(provider, domain).with_existing_mailboxes(existing_mailboxes.iter().cloned());
    for (name, value) in row {
        if name == FieldName::PasswordResetEmail && !value.is_empty() {
            form.set_field_visible(name, true)?;
            form.set_field_required(name, true)?;
        }
        form.set_field_value(name, value)?;
        form.set_field_touched(name, true)?;
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    //! Unit tests for batch file parsing.

    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::domain::ports::FixtureAvailabilityChecker;

    const TITAN_BATCH: &str = r#"{
        "provider": "titan",
        "domain": "example.com",
        "existingMailboxes": ["info"],
        "mailboxes": [
            { "uuid": "first", "mailbox": "john.doe", "password": "LongEnoughPassword1", "isAdmin": true },
            { "uuid": "second", "mailbox": "jane", "password": "LongEnoughPassword1",
              "passwordResetEmail": "jane@gmail.com" }
        ]
    }"#;

    #[rstest]
    fn reads_batch_from_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(TITAN_BATCH.as_bytes()).expect("write batch");

        let batch = BatchFile::from_path(file.path()).expect("batch parses");
        assert_eq!(batch.provider, Provider::Titan);
        assert_eq!(batch.existing_mailboxes, ["info"]);
        assert_eq!(batch.mailboxes.len(), 2);
    }

    #[rstest]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let error = BatchFile::from_path(&path).expect_err("missing file");
        assert!(matches!(error, BatchFileError::Io { path: ref reported, .. } if *reported == path));
    }

    #[rstest]
    #[case::unknown_provider(r#"{"provider":"exchange","domain":"a.com","mailboxes":[]}"#)]
    #[case::unknown_field(r#"{"provider":"titan","domain":"a.com","mailboxes":[{"nickname":"x"}]}"#)]
    #[case::unknown_key(r#"{"provider":"titan","domain":"a.com","mailboxes":[],"extra":1}"#)]
    #[case::truncated(r#"{"provider":"titan""#)]
    fn malformed_json_is_rejected(#[case] json: &str) {
        assert!(matches!(
            BatchFile::from_json(json),
            Err(BatchFileError::Json { .. })
        ));
    }

    #[rstest]
    fn rows_become_forms_in_order() {
        let forms = BatchFile::from_json(TITAN_BATCH)
            .expect("batch parses")
            .into_forms()
            .expect("rows fit the titan form");

        let uuids: Vec<&str> = forms.iter().map(MailboxForm::uuid).collect();
        assert_eq!(uuids, ["first", "second"]);
        assert_eq!(forms[0].existing_mailboxes(), ["info"]);
        assert_eq!(
            forms[0].field_value(FieldName::IsAdmin),
            Some(&FieldValue::Flag(true))
        );
        let reset = forms[1]
            .field(FieldName::PasswordResetEmail)
            .expect("reset email field");
        assert!(reset.is_visible() && reset.is_required() && reset.is_touched());
    }

    #[rstest]
    fn foreign_fields_name_the_row() {
        let json = r#"{
            "provider": "titan",
            "domain": "example.com",
            "mailboxes": [{ "mailbox": "a" }, { "firstName": "Jo" }]
        }"#;
        let error = BatchFile::from_json(json)
            .expect("batch parses")
            .into_forms()
            .expect_err("titan has no first name");
        assert!(matches!(
            error,
            BatchFileError::Row {
                index: 1,
                source: FormError::FieldNotInForm {
                    field: FieldName::FirstName,
                    ..
                }
            }
        ));
    }

    #[rstest]
    #[case::into_forms(false)]
    #[case::into_operations(true)]
    fn repeated_form_ids_are_rejected(#[case] build_operations: bool) {
        let json = r#"{
            "provider": "titan",
            "domain": "example.com",
            "mailboxes": [
                { "uuid": "same", "mailbox": "john.doe" },
                { "uuid": "other", "mailbox": "jane" },
                { "uuid": "same", "mailbox": "john.doe" }
            ]
        }"#;
        let batch = BatchFile::from_json(json).expect("batch parses");
        let error = if build_operations {
            batch
                .into_operations(Arc::new(FixtureAvailabilityChecker))
                .err()
                .expect("repeated id")
        } else {
            batch.into_forms().expect_err("repeated id")
        };
        assert!(matches!(
            error,
            BatchFileError::DuplicateUuid {
                ref uuid,
                first: 0,
                second: 2,
            } if uuid == "same"
        ));
    }

    #[rstest]
    fn operations_keep_row_order() {
        let operations = BatchFile::from_json(TITAN_BATCH)
            .expect("batch parses")
            .into_operations(Arc::new(FixtureAvailabilityChecker))
            .expect("operations build");
        assert_eq!(operations.forms().len(), 2);
        assert_eq!(operations.forms()[1].mailbox_name(), "jane");
    }
}
