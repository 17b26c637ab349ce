//! Boundary checks for the `mailbox-forms` crate.
//!
//! Every `.rs` file under `mailbox/src` is parsed with `syn` and checked
//! against the rule table in [`rules`]. The table encodes the crate's
//! hexagonal shape: the validation `domain` never reaches into adapters,
//! HTTP stays in `outbound`, regular expressions stay in the domain
//! validators, and only `outbound` adapters or the port module itself
//! implement the availability port.
//!
//! Test-only code (`*_tests.rs` files and `#[cfg(test)]` modules) is exempt.
//!
//! Run it with `cargo run -p architecture-lint`.

mod references;
pub mod rules;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use references::References;

/// Library name of the checked crate, as written in absolute paths.
pub(crate) const CRATE_NAME: &str = "mailbox_forms";

/// One Rust file, addressed relative to `mailbox/src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to `mailbox/src`.
    pub path: PathBuf,
    /// Rust source text.
    pub text: String,
}

impl SourceFile {
    /// Pair a relative path with its source text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    fn is_test_only(&self) -> bool {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem == "tests" || stem.ends_with("_tests"))
    }
}

/// A rule broken by one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Finding {
    /// Path relative to `mailbox/src`.
    pub file: PathBuf,
    /// Identifier of the broken rule.
    pub rule: &'static str,
    /// What the file references that the rule forbids.
    pub detail: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.file.display(), self.rule, self.detail)
    }
}

/// Reasons a lint run fails.
#[derive(Debug)]
pub enum LintError {
    /// A directory or file could not be read.
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A file is not valid Rust.
    Syntax {
        /// Offending file.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// The sources break one or more rules.
    Findings(Vec<Finding>),
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Syntax { file, message } => {
                write!(f, "cannot parse {}: {message}", file.display())
            }
            Self::Findings(findings) => {
                writeln!(f, "{} boundary finding(s):", findings.len())?;
                for finding in findings {
                    writeln!(f, "  {finding}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Syntax { .. } | Self::Findings(_) => None,
        }
    }
}

/// Check every source file of the crate rooted at `crate_dir`.
///
/// # Errors
///
/// Returns [`LintError::Io`] when the tree cannot be read, and otherwise the
/// same errors as [`check_sources`].
pub fn check_crate(crate_dir: &Path) -> Result<(), LintError> {
    let src_dir = crate_dir.join("src");
    let mut files = Vec::new();
    read_tree(&src_dir, &src_dir, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    check_sources(&files)
}

/// Check in-memory sources.
///
/// # Errors
///
/// Returns [`LintError::Syntax`] for the first file that does not parse and
/// [`LintError::Findings`] with every broken rule otherwise.
pub fn check_sources(files: &[SourceFile]) -> Result<(), LintError> {
    let mut findings = Vec::new();
    for file in files.iter().filter(|file| !file.is_test_only()) {
        let parsed = syn::parse_file(&file.text).map_err(|err| LintError::Syntax {
            file: file.path.clone(),
            message: err.to_string(),
        })?;
        let references = References::collect(&parsed);
        findings.extend(rules::evaluate(&file.path, &references));
    }

    if findings.is_empty() {
        Ok(())
    } else {
        findings.sort();
        Err(LintError::Findings(findings))
    }
}

fn read_tree(root: &Path, dir: &Path, files: &mut Vec<SourceFile>) -> Result<(), LintError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| LintError::Io { path, source }
    };

    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_dir() {
            read_tree(root, &path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let text = fs::read_to_string(&path).map_err(io_error(&path))?;
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            files.push(SourceFile::new(relative, text));
        }
    }
    Ok(())
}
