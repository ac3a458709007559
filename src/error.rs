//! Roster error types.
//!
//! Every failure in the core is reported back to the caller as one of these;
//! none of them is fatal to the process.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::StudentId;

#[derive(Debug, Error)]
pub enum RosterError {
    /// `add_record` was given an id that is already filed.
    #[error("student ID {0} already exists")]
    DuplicateKey(StudentId),

    /// The operation targets an id that is not in the roster.
    #[error("student ID {0} not found")]
    NotFound(StudentId),

    /// The data file could not be opened, read or written.
    #[error("cannot access {}: {source}", .path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the data file does not follow `id name count grades...`.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

impl RosterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RosterError::IoUnavailable { path: path.into(), source }
    }

    /// Errors that describe the roster's contents rather than the file system.
    pub fn is_lookup(&self) -> bool {
        matches!(self, RosterError::DuplicateKey(_) | RosterError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
