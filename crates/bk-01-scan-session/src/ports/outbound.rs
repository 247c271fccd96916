//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application implements for the scan session.

use crate::service::Command;
use shared_types::{DeviceAddress, RawAdvertisement};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

/// Handle the radio uses to hand advertisements to the session.
///
/// Cheap to clone and safe to call from any thread: `deliver` only queues
/// the advertisement; it is processed later on the session task.
#[derive(Debug, Clone)]
pub struct AdvertisementSink {
    commands: mpsc::UnboundedSender<Command>,
}

impl AdvertisementSink {
    pub(crate) fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Self { commands }
    }

    /// Queue one advertisement.
    ///
    /// Returns `false` if the session is gone; the advertisement is dropped.
    pub fn deliver(&self, advertisement: RawAdvertisement) -> bool {
        let delivered = self
            .commands
            .send(Command::Advertisement(advertisement))
            .is_ok();
        if !delivered {
            trace!("Advertisement dropped: scan session closed");
        }
        delivered
    }
}

/// Abstract interface for the platform radio.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl RadioScanner for BluezScanner {
///     fn start_scan(&self, sink: AdvertisementSink) -> Result<(), RadioError> {
///         let adapter = self.adapter.clone();
///         std::thread::spawn(move || {
///             for event in adapter.le_events() {
///                 sink.deliver(RawAdvertisement::new(event.addr, event.rssi, event.data));
///             }
///         });
///         Ok(())
///     }
///     fn stop_scan(&self) { self.adapter.stop_le_scan(); }
/// }
/// ```
pub trait RadioScanner: Send + Sync {
    /// Begin delivering advertisements to `sink`.
    ///
    /// Deliveries may come from any thread.
    fn start_scan(&self, sink: AdvertisementSink) -> Result<(), RadioError>;

    /// Stop delivering advertisements and release the sink.
    fn stop_scan(&self);
}

/// Errors from the radio collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadioError {
    /// No radio adapter present or it is powered off.
    #[error("radio unavailable: {0}")]
    Unavailable(String),
    /// The adapter refused to start scanning.
    #[error("radio refused scan: {0}")]
    Refused(String),
}

/// Answer of the permission collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// Scanning may proceed.
    Granted,
    /// Not authorized; the provider has started (or shown) a request flow.
    RequestPending,
}

/// Abstract interface for the platform's scan/location permission.
pub trait PermissionProvider: Send + Sync {
    /// Check authorization, starting a request flow if it is missing.
    fn check_authorization(&self) -> Authorization;
}

/// Membership test against the device registry.
///
/// Already-remembered devices are never surfaced as discoveries.
pub trait RegistryMembership: Send + Sync {
    /// Whether `address` is a remembered device.
    fn is_remembered(&self, address: &DeviceAddress) -> bool;
}

impl<F> RegistryMembership for F
where
    F: Fn(&DeviceAddress) -> bool + Send + Sync,
{
    fn is_remembered(&self, address: &DeviceAddress) -> bool {
        self(address)
    }
}
