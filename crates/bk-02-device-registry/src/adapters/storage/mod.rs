//! Storage Adapters
//!
//! Implementations of the `StorageBackend` trait.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
