use crate::domain::StorageError;
use crate::ports::StorageBackend;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// In-memory store for unit tests, with fault injection.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    stores: Mutex<HashMap<String, Vec<u8>>>,
    failing_reads: Mutex<HashSet<String>>,
    failing_writes: Mutex<HashSet<String>>,
    writes: Mutex<HashMap<String, usize>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw bytes into store `name`.
    pub fn insert(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.stores.lock().insert(name.to_string(), bytes.into());
    }

    /// Raw content of store `name`.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.stores.lock().get(name).cloned()
    }

    /// Whether store `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.stores.lock().contains_key(name)
    }

    /// Successful `write_all` calls on store `name`.
    pub fn write_count(&self, name: &str) -> usize {
        self.writes.lock().get(name).copied().unwrap_or(0)
    }

    /// Make reads of store `name` fail with an I/O error.
    pub fn fail_reads(&self, name: &str) {
        self.failing_reads.lock().insert(name.to_string());
    }

    /// Make writes (and creation) of store `name` fail with an I/O error.
    pub fn fail_writes(&self, name: &str) {
        self.failing_writes.lock().insert(name.to_string());
    }

    /// Clear all injected faults.
    pub fn heal(&self) {
        self.failing_reads.lock().clear();
        self.failing_writes.lock().clear();
    }

    fn injected(name: &str, op: &str) -> StorageError {
        StorageError::io(name, std::io::Error::other(format!("injected {op} failure")))
    }
}

impl StorageBackend for InMemoryStorage {
    fn open_or_create(&self, name: &str) -> Result<(), StorageError> {
        if self.failing_writes.lock().contains(name) {
            return Err(Self::injected(name, "create"));
        }
        self.stores.lock().entry(name.to_string()).or_default();
        Ok(())
    }

    fn read_all(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        if self.failing_reads.lock().contains(name) {
            return Err(Self::injected(name, "read"));
        }
        self.get(name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if self.failing_writes.lock().contains(name) {
            return Err(Self::injected(name, "write"));
        }
        self.stores.lock().insert(name.to_string(), bytes.to_vec());
        *self.writes.lock().entry(name.to_string()).or_default() += 1;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.stores.lock().remove(name);
        Ok(())
    }
}
