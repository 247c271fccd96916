//! # Device Registry
//!
//! Durable list of the tags the user chose to remember.
//!
//! ## Persistence
//!
//! Two stores live side by side:
//!
//! | Store | Schema | Role |
//! |-------|--------|------|
//! | primary (`devices.v2`) | `RememberedDevice` | the registry itself |
//! | legacy (`devices.v1`) | `LegacyDeviceRecord` | attributes of every tag ever remembered |
//!
//! Every successful save of the primary store is followed by a merge into
//! the legacy store, which is what lets a forgotten tag come back with its
//! alias and color.
//!
//! ## Error Policy
//!
//! Load and save failures are reported to the `Diagnostics` collaborator
//! and never returned: a failed load is an empty registry, a failed save
//! leaves the in-memory snapshot authoritative.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{FileStorage, InMemoryStorage, RecordCodec};
pub use domain::{
    merge_into_legacy, CodecError, LegacyDeviceRecord, LegacyRecovery, RegistryConfig,
    RegistryError, StorageError,
};
pub use ports::StorageBackend;
pub use service::DeviceRegistry;
