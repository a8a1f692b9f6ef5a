//! Error types for arcshell
//!
//! Only failures that abort a session or its startup are [`Error`]s.
//! Rejected commands (bad arguments, missing paths, unknown names) are
//! reported through [`ExecResult`](crate::ExecResult) and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using arcshell's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// arcshell error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or is incomplete.
    #[error("config error: {0}")]
    Config(String),

    /// The backing archive does not exist.
    #[error("filesystem not found at {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// The backing archive exists but could not be indexed.
    #[error("archive error: {0}")]
    Archive(String),

    /// I/O error from the host filesystem (archive, audit log, start script).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The audit sink rejected a record.
    #[error("audit error: {0}")]
    Audit(String),

    /// A command line was submitted after `exit`.
    #[error("session is closed")]
    SessionClosed,
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Archive(other.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}
