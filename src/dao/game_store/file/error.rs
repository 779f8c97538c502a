//! Error types raised by the file-backed snapshot store.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`FileDaoError`] failures.
pub type FileResult<T> = Result<T, FileDaoError>;

/// Failures that can occur while reading or writing the snapshot file.
#[derive(Debug, Error)]
pub enum FileDaoError {
    /// The snapshot directory could not be created.
    #[error("failed to create snapshot directory `{path}`")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading the snapshot failed for a reason other than absence.
    #[error("failed to read snapshot `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing the staged snapshot failed.
    #[error("failed to write snapshot `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Moving the staged snapshot into place failed.
    #[error("failed to move snapshot into `{path}`")]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Deleting the snapshot failed.
    #[error("failed to remove snapshot `{path}`")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The snapshot path exists but is not a regular file.
    #[error("snapshot path `{path}` is not a file")]
    NotAFile { path: PathBuf },
    /// Serializing the snapshot failed.
    #[error("failed to encode snapshot")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    /// The stored JSON does not match the snapshot schema.
    #[error("failed to decode snapshot `{path}`")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<FileDaoError> for StorageError {
    fn from(err: FileDaoError) -> Self {
        let message = err.to_string();
        match err {
            FileDaoError::Decode { .. } => StorageError::malformed(message, err),
            other => StorageError::unavailable(message, other),
        }
    }
}
