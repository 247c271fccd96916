//! # Driven Ports (Outbound SPI)

use crate::domain::StorageError;
use std::sync::Arc;

/// Abstract interface for named byte stores.
///
/// The registry keeps two stores (current and legacy) and always reads or
/// writes a store as a whole.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl StorageBackend for SqliteBlobs {
///     fn read_all(&self, name: &str) -> Result<Vec<u8>, StorageError> {
///         self.conn
///             .query_row("SELECT data FROM blobs WHERE name = ?1", [name], |r| r.get(0))
///             .map_err(|_| StorageError::NotFound { name: name.into() })
///     }
///     // ...
/// }
/// ```
pub trait StorageBackend: Send + Sync {
    /// Create the store empty if it does not exist yet.
    fn open_or_create(&self, name: &str) -> Result<(), StorageError>;

    /// Read the whole store.
    ///
    /// Returns `StorageError::NotFound` if it was never created.
    fn read_all(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace the whole store with `bytes`.
    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Delete the store. Deleting a missing store succeeds.
    fn remove(&self, name: &str) -> Result<(), StorageError>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for Arc<S> {
    fn open_or_create(&self, name: &str) -> Result<(), StorageError> {
        (**self).open_or_create(name)
    }

    fn read_all(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        (**self).read_all(name)
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write_all(name, bytes)
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        (**self).remove(name)
    }
}
