//! # Record Codec
//!
//! Store files are a fixed header followed by a bincode payload:
//!
//! ```text
//! [magic "BKDR":4][schema version:u16 LE][payload length:u32 LE][crc32:u32 LE][payload]
//! ```
//!
//! The schema version separates the legacy store from the current one, so
//! reading a store with the wrong schema fails cleanly instead of decoding
//! garbage. An empty store decodes to an empty record list.

use crate::domain::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Store file magic bytes.
pub const MAGIC: [u8; 4] = *b"BKDR";

/// Header length in bytes.
pub const HEADER_LEN: usize = 14;

/// Encoder/decoder for one record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCodec {
    version: u16,
}

impl RecordCodec {
    /// Legacy store: `LegacyDeviceRecord`.
    pub const LEGACY: Self = Self { version: 1 };
    /// Current store: `RememberedDevice`.
    pub const CURRENT: Self = Self { version: 2 };

    /// Schema version written into the header.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Encode `records` with header and checksum.
    pub fn encode<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>, CodecError> {
        let payload = bincode::serialize(records).map_err(|e| CodecError::Encode(e.to_string()))?;
        let length = u32::try_from(payload.len())
            .map_err(|_| CodecError::Encode(format!("payload of {} bytes too large", payload.len())))?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode a store written by [`encode`](Self::encode).
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>, CodecError> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        if bytes.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(CodecError::BadMagic);
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != self.version {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                expected: self.version,
            });
        }

        let length = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        let expected_crc = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

        let total = HEADER_LEN.saturating_add(length);
        if bytes.len() < total {
            return Err(CodecError::Truncated {
                expected: total,
                actual: bytes.len(),
            });
        }
        if bytes.len() > total {
            return Err(CodecError::Decode(format!(
                "{} trailing bytes",
                bytes.len() - total
            )));
        }

        let payload = &bytes[HEADER_LEN..];
        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(CodecError::ChecksumMismatch {
                expected: expected_crc,
                actual: actual_crc,
            });
        }

        bincode::deserialize(payload).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
