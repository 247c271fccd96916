//! # Legacy Records
//!
//! The first store format kept only the user attributes of a tag. It is
//! still maintained next to the current store so that a tag forgotten and
//! later re-added gets its alias, color and alert flag back.

use serde::{Deserialize, Serialize};
use shared_types::{DeviceAddress, RememberedDevice, TagColor};

/// Record of the legacy (v1) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDeviceRecord {
    pub address: DeviceAddress,
    pub alias: Option<String>,
    /// `TagColor::code()` value.
    pub color_code: u8,
    pub alert_on_disconnect: bool,
}

impl LegacyDeviceRecord {
    /// Copy the recoverable attributes onto a freshly created device.
    pub fn seed(&self, device: &mut RememberedDevice) {
        device.alias.clone_from(&self.alias);
        device.color = TagColor::from_code(self.color_code);
        device.alert_on_disconnect = self.alert_on_disconnect;
    }
}

impl From<&RememberedDevice> for LegacyDeviceRecord {
    fn from(device: &RememberedDevice) -> Self {
        Self {
            address: device.address.clone(),
            alias: device.alias.clone(),
            color_code: device.color.code(),
            alert_on_disconnect: device.alert_on_disconnect,
        }
    }
}

impl AsRef<DeviceAddress> for LegacyDeviceRecord {
    fn as_ref(&self) -> &DeviceAddress {
        &self.address
    }
}

/// Merge the current registry into the legacy snapshot.
///
/// Legacy order is kept. A legacy record whose address is also current is
/// replaced by the current data; current records with no legacy
/// counterpart are appended in registry order.
pub fn merge_into_legacy(
    legacy: &[LegacyDeviceRecord],
    current: &[RememberedDevice],
) -> Vec<LegacyDeviceRecord> {
    let mut merged: Vec<LegacyDeviceRecord> = legacy
        .iter()
        .map(|old| {
            current
                .iter()
                .find(|device| device.address == old.address)
                .map_or_else(|| old.clone(), LegacyDeviceRecord::from)
        })
        .collect();

    merged.extend(
        current
            .iter()
            .filter(|device| !legacy.iter().any(|old| old.address == device.address))
            .map(LegacyDeviceRecord::from),
    );
    merged
}

/// Legacy record for `address`, if any.
pub fn find_legacy<'a>(
    legacy: &'a [LegacyDeviceRecord],
    address: &DeviceAddress,
) -> Option<&'a LegacyDeviceRecord> {
    legacy.iter().find(|record| &record.address == address)
}
