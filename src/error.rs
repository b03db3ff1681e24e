use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which half of a [`Selection`](crate::data::filter::Selection) a missing name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Class,
    Attribute,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Class => write!(f, "class label"),
            SelectionKind::Attribute => write!(f, "attribute"),
        }
    }
}

/// Every failure the data tools and the runner can report.
///
/// None of these are recoverable: the caller reports and exits.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Source missing, unreadable, not JSON, or an unsupported table format.
    #[error("invalid input {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// Document is well-formed JSON but does not have the dataset shape.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("{kind} not found in dataset: {name:?}")]
    SelectionNotFound { kind: SelectionKind, name: String },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("failed to write {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {executable}")]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn invalid_input(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        DatasetError::InvalidInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
