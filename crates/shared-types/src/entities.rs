//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Radio**: `DeviceAddress`, `RawAdvertisement`, `ScanResult`
//! - **Registry**: `RememberedDevice`, `TagColor`

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

// =============================================================================
// CLUSTER A: RADIO
// =============================================================================

/// Stable identifier of a beacon device (its hardware address).
///
/// Addresses are compared after normalisation: surrounding whitespace is
/// trimmed and ASCII letters are upper-cased, so `"aa:bb"` and `" AA:BB "`
/// name the same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Parse a raw address string.
    ///
    /// Returns `None` for an empty or blank address (the radio could not
    /// resolve the device).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalised address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<DeviceAddress> for DeviceAddress {
    fn as_ref(&self) -> &DeviceAddress {
        self
    }
}

/// A single advertisement as delivered by the radio collaborator.
///
/// The address is kept raw: the radio may hand over an empty string for
/// devices it could not resolve, and intake is where that gets filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAdvertisement {
    /// Address as reported by the radio (possibly empty).
    pub address: String,
    /// Received signal strength in dBm.
    pub signal_strength: i16,
    /// Opaque advertisement payload.
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl RawAdvertisement {
    /// Create a new advertisement.
    pub fn new(address: impl Into<String>, signal_strength: i16, payload: Vec<u8>) -> Self {
        Self {
            address: address.into(),
            signal_strength,
            payload,
        }
    }

    /// The resolved device address, if the radio provided one.
    pub fn device_address(&self) -> Option<DeviceAddress> {
        DeviceAddress::parse(&self.address)
    }
}

/// A device seen during the current scan session.
///
/// One live entry exists per address; later advertisements from the same
/// device refresh it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Resolved device address.
    pub address: DeviceAddress,
    /// Most recent accepted signal strength in dBm.
    pub signal_strength: i16,
    /// Most recent accepted payload.
    pub payload: Vec<u8>,
    /// When the device was first seen in this session.
    pub first_seen: Instant,
    /// When the entry was last refreshed.
    pub last_updated: Instant,
}

impl ScanResult {
    /// Create an entry from the first advertisement seen for `address`.
    pub fn new(address: DeviceAddress, advertisement: &RawAdvertisement, now: Instant) -> Self {
        Self {
            address,
            signal_strength: advertisement.signal_strength,
            payload: advertisement.payload.clone(),
            first_seen: now,
            last_updated: now,
        }
    }

    /// Refresh signal strength and payload from a newer advertisement.
    pub fn refresh(&mut self, advertisement: &RawAdvertisement, now: Instant) {
        self.signal_strength = advertisement.signal_strength;
        self.payload.clone_from(&advertisement.payload);
        self.last_updated = now;
    }
}

impl AsRef<DeviceAddress> for ScanResult {
    fn as_ref(&self) -> &DeviceAddress {
        &self.address
    }
}

// =============================================================================
// CLUSTER B: REGISTRY
// =============================================================================

/// Color of the physical tag, chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagColor {
    /// Default color for tags never customised.
    #[default]
    Black,
    White,
    Red,
    Green,
    Blue,
    Gold,
}

impl TagColor {
    /// Numeric code used by the legacy record format.
    pub fn code(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::White => 1,
            Self::Red => 2,
            Self::Green => 3,
            Self::Blue => 4,
            Self::Gold => 5,
        }
    }

    /// Decode a legacy color code. Unknown codes fall back to the default.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::White,
            2 => Self::Red,
            3 => Self::Green,
            4 => Self::Blue,
            5 => Self::Gold,
            _ => Self::Black,
        }
    }
}

/// A device the user chose to keep track of.
///
/// `address` is the registry key. `alias`, `color` and `alert_on_disconnect`
/// are user attributes and survive a forget/remember cycle through the
/// legacy store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedDevice {
    /// Registry key.
    pub address: DeviceAddress,
    /// User-chosen display name.
    pub alias: Option<String>,
    /// User-chosen tag color.
    pub color: TagColor,
    /// Whether the user wants an alert when the tag goes out of range.
    pub alert_on_disconnect: bool,
    /// Signal strength observed when the device was remembered.
    pub last_signal_strength: Option<i16>,
    /// When the device was remembered.
    pub remembered_at: Timestamp,
}

impl RememberedDevice {
    /// Create a record with default user attributes.
    pub fn new(address: DeviceAddress, remembered_at: Timestamp) -> Self {
        Self {
            address,
            alias: None,
            color: TagColor::default(),
            alert_on_disconnect: true,
            last_signal_strength: None,
            remembered_at,
        }
    }

    /// Set the signal strength observed at remember-time.
    #[must_use]
    pub fn with_signal_strength(mut self, signal_strength: i16) -> Self {
        self.last_signal_strength = Some(signal_strength);
        self
    }

    /// Display name: the alias when set, otherwise the address.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.address.as_str())
    }
}

impl AsRef<DeviceAddress> for RememberedDevice {
    fn as_ref(&self) -> &DeviceAddress {
        &self.address
    }
}
