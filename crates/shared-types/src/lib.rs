//! # Shared Types Crate
//!
//! Value types that cross crate boundaries in Beacon Keeper.
//!
//! ## Contents
//!
//! - **Entities**: `DeviceAddress`, `RawAdvertisement`, `RememberedDevice`, `TagColor`
//! - **Time**: `Timestamp` and the `TimeSource` port
//! - **Diagnostics**: the fire-and-forget error/analytics collaborator

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod diagnostics;
pub mod entities;
pub mod time;

pub use diagnostics::{Diagnostics, NoOpDiagnostics, TracingDiagnostics, EVENT_FORGET, EVENT_REMEMBER};
pub use entities::{DeviceAddress, RawAdvertisement, RememberedDevice, ScanResult, TagColor};
pub use time::{SystemTimeSource, TimeSource, Timestamp};

#[cfg(feature = "test-utils")]
pub use diagnostics::RecordingDiagnostics;
#[cfg(feature = "test-utils")]
pub use time::FixedTimeSource;
