//! # Bus Events
//!
//! One enum per publishing component. Consumers match on the variants
//! they care about and ignore the rest.

use shared_types::{RememberedDevice, ScanResult};

/// Scan-session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A session moved from `Idle` to `Scanning`.
    Started,

    /// The session clock advanced.
    Tick {
        /// Ticks elapsed in this session (1-based).
        current: u32,
        /// Ticks after which the session times out.
        max: u32,
    },

    /// A device was discovered, or a known one refreshed after the
    /// throttle window.
    NewDeviceDiscovered(ScanResult),

    /// The session returned to `Idle`.
    Stopped,
}

impl ScanEvent {
    /// Short event name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Tick { .. } => "tick",
            Self::NewDeviceDiscovered(_) => "new_device_discovered",
            Self::Stopped => "stopped",
        }
    }
}

/// Device-registry change events.
///
/// Every mutation publishes its specific event first and `Changed` last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A device was remembered.
    Added(RememberedDevice),
    /// A device was forgotten.
    Removed(RememberedDevice),
    /// The registry contents changed.
    Changed,
}

impl RegistryEvent {
    /// Short event name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Removed(_) => "removed",
            Self::Changed => "changed",
        }
    }
}
