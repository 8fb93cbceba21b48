//! Error types for the price file store.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested file or directory does not exist.
    #[error("file {} not found", .0.display())]
    NotFound(PathBuf),

    /// The requested path would escape the data root.
    #[error("invalid path '{0}': must be relative to the data directory")]
    InvalidPath(String),

    /// Any other I/O failure.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
