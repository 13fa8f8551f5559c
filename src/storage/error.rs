use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for persistence adapter operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying map lock was poisoned (a thread panicked while holding it).
    #[error("storage poisoned during {0}")]
    Poisoned(&'static str),
    /// Filesystem failure while reading, writing or removing a key.
    #[error("storage io error for key {key} at {}: {source}", .path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The key cannot be mapped onto this backend (e.g. it contains a path separator).
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    /// The backend is not usable right now (quota exceeded, disabled, offline...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
