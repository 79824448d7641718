//! Flat-file persistence for notes and study plans.
//!
//! # Responsibility
//! - Define append/list contracts per record kind.
//! - Keep JSON file handling inside the persistence boundary.
//!
//! # Invariants
//! - A missing backing file reads as an empty collection.
//! - Every write rewrites the whole collection through a temp file.
//! - Unparseable files surface as `StoreError::Corrupt`, never as empty.

pub mod collection;
pub mod note_repo;
pub mod task_repo;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for collection reads and writes.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file or directory could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Backing file exists but is not a JSON array of the expected records.
    Corrupt { path: PathBuf, message: String },
    /// Records could not be encoded for writing.
    Encode { path: PathBuf, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {source}", path.display())
            }
            Self::Corrupt { path, message } => {
                write!(f, "store file `{}` is corrupt: {message}", path.display())
            }
            Self::Encode { path, message } => {
                write!(f, "failed to encode records for `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
            Self::Encode { .. } => None,
        }
    }
}
