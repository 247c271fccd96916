//! # Registry Service
//!
//! `DeviceRegistry` wires the domain rules to a `StorageBackend`, the
//! diagnostics collaborator and the registry event bus.

mod registry;

pub use registry::DeviceRegistry;
