use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RecentlyViewedError {
    /// The caller handed in something the history cannot hold.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
