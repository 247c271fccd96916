//! # Adapters Layer
//!
//! - `storage`: `StorageBackend` implementations (file, in-memory)
//! - `codec`: versioned record encoding with integrity check

pub mod codec;
pub mod storage;

pub use codec::RecordCodec;
pub use storage::{FileStorage, InMemoryStorage};
