//! # Domain Errors
//!
//! Error types for the device registry. None of them escape the public
//! registry operations: they are reported to diagnostics and the operation
//! degrades (empty registry, skipped write).

use thiserror::Error;

/// Failure of the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The named store does not exist yet.
    #[error("store '{name}' not found")]
    NotFound { name: String },

    /// The backend could not read or write the store.
    #[error("store '{name}' I/O failure: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error for store `name`.
    pub fn io(name: &str, source: std::io::Error) -> Self {
        Self::Io {
            name: name.to_string(),
            source,
        }
    }

    /// Whether the store simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure to turn stored bytes into records or back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes than the header or the declared payload length.
    #[error("truncated record data: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Not a record file.
    #[error("bad magic bytes")]
    BadMagic,

    /// Written with a different record schema.
    #[error("unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    /// Payload does not match its checksum.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Payload could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Records could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Registry error taxonomy.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Load or save I/O failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Persisted content is unreadable or of the wrong schema.
    #[error("corrupt data in '{store}': {source}")]
    CorruptData {
        store: String,
        #[source]
        source: CodecError,
    },
}

impl RegistryError {
    pub(crate) fn corrupt(store: &str, source: CodecError) -> Self {
        Self::CorruptData {
            store: store.to_string(),
            source,
        }
    }
}
