//! # Scan Session
//!
//! Bounded-duration BLE scanning for Beacon Keeper.
//!
//! A session consumes raw advertisements from the platform radio, drops
//! devices the registry already remembers, throttles repeats per address
//! and publishes discoveries on an [`ObserverBus`](shared_bus::ObserverBus).
//!
//! ## Architecture
//!
//! - **Domain Layer:** session state, result set, throttle, timings
//! - **Ports Layer:** `ScanSessionApi` (driving), radio/permission/membership (driven)
//! - **Service Layer:** the session actor and its public handle
//! - **Adapters Layer:** default collaborators
//!
//! ## Example
//!
//! ```rust,ignore
//! use bk_01_scan_session::{ScanSession, ScanSessionApi, ScanConfig};
//! use shared_bus::ScanEvent;
//!
//! let session = ScanSession::builder(radio).config(ScanConfig::with_max_ticks(30)).spawn();
//! let (listener, mut events) = shared_bus::ChannelListener::channel();
//! session.bus().subscribe(listener);
//!
//! session.start().await?;
//! while let Some(event) = events.recv().await {
//!     if matches!(event, ScanEvent::Stopped) { break; }
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{AlwaysGranted, NoRegistry};
pub use domain::{Intake, ResultSet, ScanConfig, ScanError, SessionState};
pub use ports::{
    AdvertisementSink, Authorization, PermissionProvider, RadioError, RadioScanner,
    RegistryMembership, ScanSessionApi,
};
pub use service::{ScanSession, ScanSessionBuilder};
