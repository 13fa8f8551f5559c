//! Storage - durable key-value slots the history is persisted into.
//!
//! The store only ever touches a single key, holding the whole history as one
//! JSON string. Hosts plug in whatever backs that slot: browser-style local
//! storage, a file per key, a settings table.
//!
//! ## Example
//!
//! ```ignore
//! use recently_viewed::{InMemoryStorage, Storage};
//!
//! let storage = InMemoryStorage::new();
//! storage.save("recently_viewed", "[]")?;
//! assert_eq!(storage.load("recently_viewed")?.as_deref(), Some("[]"));
//! ```

mod error;
mod file;
mod in_memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;

/// Durable string storage addressed by key.
///
/// Implementations are expected to be cheap for small payloads; the store calls
/// them synchronously while holding its state lock.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`. Returns `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store (or overwrite) the value under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
