//! # Wall-Clock Time
//!
//! `Timestamp` is milliseconds since the Unix epoch. Components that stamp
//! durable records take a `TimeSource` so tests can pin the clock.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the epoch.
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Abstract interface for reading the wall clock.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Production time source using the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// Create a new system time source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Timestamp::new(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

/// A time source that returns a fixed timestamp.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: u64,
}

#[cfg(any(test, feature = "test-utils"))]
impl FixedTimeSource {
    /// Create a new fixed time source (milliseconds since the epoch).
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }
}
