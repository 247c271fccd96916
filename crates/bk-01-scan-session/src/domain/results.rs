//! # In-Session Result Set
//!
//! Holds one entry per address seen in the current session and decides
//! which advertisements are worth a notification.
//!
//! ## Throttle
//!
//! The window is measured from the last *notified* update of an address,
//! not from the last advertisement. A device advertising every 100 ms
//! therefore produces one notification per window, not none.

use shared_types::{DeviceAddress, RawAdvertisement, ScanResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Outcome of feeding one advertisement into the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake {
    /// First advertisement for this address in the session.
    New(ScanResult),
    /// Known address, window elapsed: entry refreshed.
    Refreshed(ScanResult),
    /// Known address, still inside the window: dropped.
    Throttled,
}

impl Intake {
    /// The result to notify about, if any.
    pub fn into_notification(self) -> Option<ScanResult> {
        match self {
            Self::New(result) | Self::Refreshed(result) => Some(result),
            Self::Throttled => None,
        }
    }
}

/// Results of the current session, in discovery order.
#[derive(Debug)]
pub struct ResultSet {
    entries: Vec<ScanResult>,
    index: HashMap<DeviceAddress, usize>,
    last_notified: HashMap<DeviceAddress, Instant>,
    throttle_window: Duration,
}

impl ResultSet {
    /// Create an empty set with the given per-address throttle window.
    pub fn new(throttle_window: Duration) -> Self {
        Self {
            entries: Vec::with_capacity(4),
            index: HashMap::new(),
            last_notified: HashMap::new(),
            throttle_window,
        }
    }

    /// Record an advertisement from `address` observed at `now`.
    pub fn intake(
        &mut self,
        address: DeviceAddress,
        advertisement: &RawAdvertisement,
        now: Instant,
    ) -> Intake {
        let Some(&slot) = self.index.get(&address) else {
            let result = ScanResult::new(address.clone(), advertisement, now);
            self.index.insert(address.clone(), self.entries.len());
            self.entries.push(result.clone());
            self.last_notified.insert(address, now);
            return Intake::New(result);
        };

        let window_elapsed = self
            .last_notified
            .get(&address)
            .map_or(true, |last| now.saturating_duration_since(*last) >= self.throttle_window);
        if !window_elapsed {
            return Intake::Throttled;
        }

        let entry = &mut self.entries[slot];
        entry.refresh(advertisement, now);
        self.last_notified.insert(address, now);
        Intake::Refreshed(entry.clone())
    }

    /// Forget everything (new session).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.last_notified.clear();
    }

    /// Snapshot of all entries in discovery order.
    pub fn snapshot(&self) -> Vec<ScanResult> {
        self.entries.clone()
    }

    /// Entry for `address`, if seen this session.
    pub fn get(&self, address: &DeviceAddress) -> Option<&ScanResult> {
        self.index.get(address).map(|&slot| &self.entries[slot])
    }

    /// Number of distinct addresses seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: &str) -> DeviceAddress {
        DeviceAddress::parse(raw).unwrap()
    }

    fn adv(raw: &str, rssi: i16) -> RawAdvertisement {
        RawAdvertisement::new(raw, rssi, vec![0x02, 0x01, 0x06])
    }

    #[test]
    fn test_first_advertisement_is_new() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let now = Instant::now();

        let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -60), now);

        assert!(matches!(intake, Intake::New(ref r) if r.signal_strength == -60));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_repeat_inside_window_is_throttled() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0);

        let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -40), t0 + Duration::from_millis(999));

        assert_eq!(intake, Intake::Throttled);
        assert_eq!(set.get(&addr("AA:BB")).unwrap().signal_strength, -60);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_repeat_after_window_refreshes() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0);

        let later = t0 + Duration::from_millis(1000);
        let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -40), later);

        match intake {
            Intake::Refreshed(result) => {
                assert_eq!(result.signal_strength, -40);
                assert_eq!(result.first_seen, t0);
                assert_eq!(result.last_updated, later);
            }
            other => panic!("expected refresh, got {other:?}"),
        }
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_window_counts_from_last_notification() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0);

        // Dropped advertisements do not push the window forward.
        for ms in [300, 600, 900] {
            let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0 + Duration::from_millis(ms));
            assert_eq!(intake, Intake::Throttled);
        }
        let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0 + Duration::from_millis(1200));
        assert!(matches!(intake, Intake::Refreshed(_)));
    }

    #[test]
    fn test_addresses_are_throttled_independently() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0);

        let intake = set.intake(addr("CC:DD"), &adv("CC:DD", -70), t0 + Duration::from_millis(10));

        assert!(matches!(intake, Intake::New(_)));
        let order: Vec<_> = set.snapshot().into_iter().map(|r| r.address).collect();
        assert_eq!(order, vec![addr("AA:BB"), addr("CC:DD")]);
    }

    #[test]
    fn test_clear_starts_over() {
        let mut set = ResultSet::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0);
        set.clear();

        assert!(set.is_empty());
        let intake = set.intake(addr("AA:BB"), &adv("AA:BB", -60), t0 + Duration::from_millis(1));
        assert!(matches!(intake, Intake::New(_)));
    }
}
