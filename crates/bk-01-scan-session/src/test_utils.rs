//! Test doubles for the scan session.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use bk_01_scan_session::test_utils::ScriptedRadio;
//!
//! let radio = ScriptedRadio::new();
//! let session = ScanSession::builder(radio.clone()).spawn();
//! session.start().await?;
//! radio.advertise("AA:BB:CC:DD:EE:FF", -60);
//! ```

use crate::ports::{AdvertisementSink, Authorization, PermissionProvider, RadioError, RadioScanner};
use parking_lot::Mutex;
use shared_types::RawAdvertisement;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Radio driven by the test.
///
/// Keeps the sink handed over by the last `start_scan` and forwards
/// whatever the test "advertises" into it.
#[derive(Debug, Default)]
pub struct ScriptedRadio {
    sink: Mutex<Option<AdvertisementSink>>,
    fail_start: Mutex<Option<RadioError>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedRadio {
    /// Create a radio that starts successfully.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `start_scan` calls fail with `error`.
    pub fn fail_start_with(&self, error: RadioError) {
        *self.fail_start.lock() = Some(error);
    }

    /// Deliver an advertisement with an empty payload.
    ///
    /// Returns `false` if the radio is not scanning or the session is gone.
    pub fn advertise(&self, address: &str, signal_strength: i16) -> bool {
        self.deliver(RawAdvertisement::new(address, signal_strength, Vec::new()))
    }

    /// Deliver a raw advertisement.
    pub fn deliver(&self, advertisement: RawAdvertisement) -> bool {
        match self.sink.lock().as_ref() {
            Some(sink) => sink.deliver(advertisement),
            None => false,
        }
    }

    /// Whether a sink is currently registered.
    pub fn is_scanning(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Number of `start_scan` calls.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of `stop_scan` calls.
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl RadioScanner for ScriptedRadio {
    fn start_scan(&self, sink: AdvertisementSink) -> Result<(), RadioError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_start.lock().clone() {
            return Err(error);
        }
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn stop_scan(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.sink.lock().take();
    }
}

/// Permission provider with a switchable answer.
#[derive(Debug)]
pub struct StaticPermission {
    granted: AtomicBool,
    checks: AtomicUsize,
}

impl StaticPermission {
    /// Provider answering `Granted`.
    pub fn granted() -> Arc<Self> {
        Arc::new(Self {
            granted: AtomicBool::new(true),
            checks: AtomicUsize::new(0),
        })
    }

    /// Provider answering `RequestPending`.
    pub fn pending() -> Arc<Self> {
        Arc::new(Self {
            granted: AtomicBool::new(false),
            checks: AtomicUsize::new(0),
        })
    }

    /// Change the answer for subsequent checks.
    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Number of authorization checks made.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl PermissionProvider for StaticPermission {
    fn check_authorization(&self) -> Authorization {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.granted.load(Ordering::SeqCst) {
            Authorization::Granted
        } else {
            Authorization::RequestPending
        }
    }
}
