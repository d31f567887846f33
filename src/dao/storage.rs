use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value back-ends regardless of where the data lives.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("failed to access store file `{}`", path.display())]
    Io {
        /// File or directory that could not be accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The in-memory map could not be encoded for writing.
    #[error("failed to encode store contents")]
    Encode {
        /// Underlying serializer failure.
        #[source]
        source: serde_json::Error,
    },
}
