//! Test helpers for the device registry.
//!
//! Enable with the `test-utils` feature flag. They read and write store
//! contents directly so tests can stage legacy data or inspect what the
//! registry persisted.

use crate::adapters::RecordCodec;
use crate::domain::{CodecError, LegacyDeviceRecord, StorageError};
use crate::ports::StorageBackend;
use shared_types::{DeviceAddress, RememberedDevice, TagColor, Timestamp};

/// Write `records` to store `name` in the legacy schema.
pub fn write_legacy<S: StorageBackend + ?Sized>(
    storage: &S,
    name: &str,
    records: &[LegacyDeviceRecord],
) -> Result<(), StorageError> {
    let bytes = RecordCodec::LEGACY
        .encode(records)
        .map_err(|e| StorageError::io(name, std::io::Error::other(e)))?;
    storage.write_all(name, &bytes)
}

/// Write `devices` to store `name` in the current schema.
pub fn write_current<S: StorageBackend + ?Sized>(
    storage: &S,
    name: &str,
    devices: &[RememberedDevice],
) -> Result<(), StorageError> {
    let bytes = RecordCodec::CURRENT
        .encode(devices)
        .map_err(|e| StorageError::io(name, std::io::Error::other(e)))?;
    storage.write_all(name, &bytes)
}

/// Decode the legacy store `name`.
pub fn read_legacy<S: StorageBackend + ?Sized>(
    storage: &S,
    name: &str,
) -> Result<Vec<LegacyDeviceRecord>, CodecError> {
    let bytes = storage.read_all(name).unwrap_or_default();
    RecordCodec::LEGACY.decode(&bytes)
}

/// Decode the current store `name`.
pub fn read_current<S: StorageBackend + ?Sized>(
    storage: &S,
    name: &str,
) -> Result<Vec<RememberedDevice>, CodecError> {
    let bytes = storage.read_all(name).unwrap_or_default();
    RecordCodec::CURRENT.decode(&bytes)
}

/// Legacy record with the given user attributes.
pub fn legacy_record(address: &str, alias: &str, color: TagColor, alert: bool) -> LegacyDeviceRecord {
    LegacyDeviceRecord {
        address: DeviceAddress::parse(address).unwrap_or_else(|| panic!("bad test address {address:?}")),
        alias: Some(alias.to_string()),
        color_code: color.code(),
        alert_on_disconnect: alert,
    }
}

/// Remembered device with an alias.
pub fn remembered(address: &str, alias: &str, at: u64) -> RememberedDevice {
    let address = DeviceAddress::parse(address).unwrap_or_else(|| panic!("bad test address {address:?}"));
    let mut device = RememberedDevice::new(address, Timestamp::new(at));
    device.alias = Some(alias.to_string());
    device
}
