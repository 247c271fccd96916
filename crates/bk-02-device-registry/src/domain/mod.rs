//! # Domain Layer
//!
//! Registry configuration, error taxonomy and the legacy record schema with
//! its merge rule. No I/O.

pub mod config;
pub mod errors;
pub mod legacy;

pub use config::{LegacyRecovery, RegistryConfig};
pub use errors::{CodecError, RegistryError, StorageError};
pub use legacy::{find_legacy, merge_into_legacy, LegacyDeviceRecord};
