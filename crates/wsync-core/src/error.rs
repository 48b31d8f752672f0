use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors a synchronization run can fail with. Both kinds are fatal to the
/// current run: no partial application, no retry.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The caller supplied insufficient or invalid input, for example a
    /// missing package name or a nonexistent target directory.
    #[error("{0}")]
    Usage(String),

    /// An I/O operation failed at the given path.
    #[error("filesystem error at '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
