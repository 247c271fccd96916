//! # Ports Layer
//!
//! The registry is driven directly through `DeviceRegistry`; the only
//! driven port is the storage backend.

pub mod outbound;

pub use outbound::StorageBackend;
