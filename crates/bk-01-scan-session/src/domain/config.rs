//! Scan Session Configuration

use serde::Deserialize;
use std::time::Duration;

/// Timing parameters of a scan session.
///
/// # Config File Format
///
/// ```toml
/// [scan]
/// max_ticks = 30
/// tick_interval_ms = 1000
/// throttle_window_ms = 1000
/// notify_delay_ms = 600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Ticks after which the session stops on its own.
    pub max_ticks: u32,
    /// Period of the session clock.
    pub tick_interval_ms: u64,
    /// Minimum spacing between two notifications for the same address.
    pub throttle_window_ms: u64,
    /// Delay between accepting an advertisement and publishing it.
    pub notify_delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_ticks: 30,
            tick_interval_ms: 1000,
            throttle_window_ms: 1000,
            // Downstream list views drop rows inserted while they are still
            // laying out the previous one.
            notify_delay_ms: 600,
        }
    }
}

impl ScanConfig {
    /// Config with a custom session length and default timings.
    #[must_use]
    pub fn with_max_ticks(max_ticks: u32) -> Self {
        Self {
            max_ticks,
            ..Self::default()
        }
    }

    /// Session clock period, never shorter than 1 ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Per-address throttle window.
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_window_ms)
    }

    /// Discovery notification delay.
    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }
}
