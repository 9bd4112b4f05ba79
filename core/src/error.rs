//! Error types shared by the rule and hook registries.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::PatternError;

/// Errors that abort a whole registry load.
///
/// These never describe a single bad file: a file that fails to parse is
/// recorded as a [`Diagnostic`] and skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A directory under a configured root could not be read.
    #[error("failed to read directory {}: {source}", path.display())]
    Io {
        /// Directory that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a root took longer than the configured limit.
    #[error("walking {} timed out after {timeout:?}", path.display())]
    Timeout {
        /// Root that was being walked.
        path: PathBuf,
        /// The limit that was exceeded.
        timeout: Duration,
    },
}

/// Why a single steering or hook file was skipped.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The file declares a glob that does not compile.
    #[error(transparent)]
    PatternSyntax(#[from] PatternError),

    /// Steering front matter is missing, unterminated, or incomplete.
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),

    /// A hook document does not match the hook schema.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// Another file already registered this identifier.
    #[error("duplicate id '{0}'")]
    DuplicateId(String),
}

/// A per-file load failure kept alongside the registry that skipped it.
#[derive(Debug)]
pub struct Diagnostic {
    /// File that was skipped.
    pub path: PathBuf,
    /// Why it was skipped.
    pub error: FileError,
}

impl Diagnostic {
    /// Create a diagnostic for `path`.
    pub fn new(path: impl Into<PathBuf>, error: impl Into<FileError>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}
