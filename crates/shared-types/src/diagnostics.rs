//! # Diagnostics Port
//!
//! The error-reporting and analytics collaborator. Both calls are
//! fire-and-forget: they never block the caller for long and never fail.

use std::error::Error;
use tracing::{error, info, warn};

/// Analytics event recorded when a device is remembered.
pub const EVENT_REMEMBER: &str = "remember_tag";

/// Analytics event recorded when a device is forgotten.
pub const EVENT_FORGET: &str = "forget_tag";

/// Error/analytics collaborator.
pub trait Diagnostics: Send + Sync {
    /// Report a failure that was handled locally.
    ///
    /// `recoverable` is `true` when the component degraded gracefully
    /// (for example an unreadable store treated as empty).
    fn report_error(&self, error: &(dyn Error + 'static), recoverable: bool);

    /// Record a named usage event.
    fn record_event(&self, name: &str);
}

/// Default diagnostics sink writing to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report_error(&self, error: &(dyn Error + 'static), recoverable: bool) {
        if recoverable {
            warn!(error = %error, recoverable, "Recoverable failure reported");
        } else {
            error!(error = %error, recoverable, "Failure reported");
        }
    }

    fn record_event(&self, name: &str) {
        info!(target: "beacon_keeper::analytics", event = name, "Analytics event");
    }
}

/// Diagnostics sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDiagnostics;

impl Diagnostics for NoOpDiagnostics {
    fn report_error(&self, _error: &(dyn Error + 'static), _recoverable: bool) {}

    fn record_event(&self, _name: &str) {}
}

/// In-memory diagnostics sink for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    errors: parking_lot::Mutex<Vec<(String, bool)>>,
    events: parking_lot::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingDiagnostics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported errors as `(message, recoverable)` pairs.
    #[must_use]
    pub fn errors(&self) -> Vec<(String, bool)> {
        self.errors.lock().clone()
    }

    /// Recorded analytics event names, in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Clear everything recorded so far.
    pub fn clear(&self) {
        self.errors.lock().clear();
        self.events.lock().clear();
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Diagnostics for RecordingDiagnostics {
    fn report_error(&self, error: &(dyn Error + 'static), recoverable: bool) {
        self.errors.lock().push((error.to_string(), recoverable));
    }

    fn record_event(&self, name: &str) {
        self.events.lock().push(name.to_string());
    }
}
