use std::path::PathBuf;

use bucket_types::{BlobId, TypeError};

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No identifier was supplied for a lookup.
    #[error("identifier is required")]
    EmptyIdentifier,

    /// The identifier cannot be resolved safely under the storage root.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// No object is stored under the identifier.
    #[error("blob not found: {0}")]
    NotFound(BlobId),

    /// The upload content could not be read to completion.
    #[error("failed to read upload content: {0}")]
    ReadFailure(String),

    /// The destination could not be created or fully written.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage root is missing or not a directory.
    #[error("storage root unavailable: {}", .0.display())]
    RootUnavailable(PathBuf),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Wrap a failure of the upload source.
    pub fn read_failure(cause: impl std::fmt::Display) -> Self {
        Self::ReadFailure(cause.to_string())
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::EmptyIdentifier => Self::EmptyIdentifier,
            other => Self::InvalidIdentifier(other.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
