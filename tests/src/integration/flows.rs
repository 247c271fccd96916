//! # Scan Session and Registry Flows
//!
//! ## Flow 1: Remembered devices are invisible to scans
//!
//! ```text
//! Registry.remember(AA) ──→ RegistryMembershipAdapter ──→ ScanSession
//!                                                          │
//! Radio: AA, BB ──────────────────────────────────────────→ │ ──→ NewDeviceDiscovered(BB)
//! ```
//!
//! ## Flow 2: Discover, then remember
//!
//! ```text
//! scan #1 ──→ BB discovered ──→ Registry.remember_result(BB) ──→ Added, Changed
//! scan #2 ──→ BB skipped
//! ```
//!
//! ## Flow 3: Session shutdown
//!
//! `BeaconKeeper::scan_until` stops on timeout or on the shutdown future and
//! still delivers discoveries whose delayed notification lands after `Stopped`.

#[cfg(test)]
mod tests {
    use bk_01_scan_session::test_utils::ScriptedRadio;
    use bk_01_scan_session::{RadioScanner, ScanConfig, ScanSessionApi};
    use bk_02_device_registry::{InMemoryStorage, RegistryConfig};
    use keeper_runtime::{AppConfig, BeaconKeeper, ReplayRadio};
    use parking_lot::Mutex;
    use shared_bus::{ChannelListener, RegistryEvent, ScanEvent};
    use shared_types::{DeviceAddress, RecordingDiagnostics};
    use std::future::pending;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn keeper(max_ticks: u32) -> BeaconKeeper<Arc<InMemoryStorage>> {
        let config = AppConfig {
            scan: ScanConfig::with_max_ticks(max_ticks),
            registry: RegistryConfig::default(),
        };
        BeaconKeeper::with_storage(
            config,
            Arc::new(InMemoryStorage::new()),
            Arc::new(RecordingDiagnostics::new()),
        )
    }

    fn address(raw: &str) -> DeviceAddress {
        DeviceAddress::parse(raw).unwrap()
    }

    fn recording(lines: &str) -> Arc<dyn RadioScanner> {
        Arc::new(ReplayRadio::parse(lines).unwrap())
    }

    const TWO_TAGS: &str = r#"
        # keys and wallet, both in range
        {"at_ms": 0, "address": "aa:01", "rssi": -48}
        {"at_ms": 100, "address": "bb:02", "rssi": -71}
        {"at_ms": 1200, "address": "aa:01", "rssi": -45}
    "#;

    fn discovered(events: &[ScanEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                ScanEvent::NewDeviceDiscovered(result) => Some(result.address.to_string()),
                _ => None,
            })
            .collect()
    }

    fn lifecycle(events: &[ScanEvent]) -> Vec<ScanEvent> {
        events
            .iter()
            .filter(|event| !matches!(event, ScanEvent::NewDeviceDiscovered(_)))
            .cloned()
            .collect()
    }

    // =========================================================================
    // FLOW 1: MEMBERSHIP FILTER
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_remembered_device_is_skipped_by_scan() {
        let keeper = keeper(2);
        keeper.registry().remember_address(address("AA:01"), Some(-40)).unwrap();

        let mut events = Vec::new();
        let results = keeper
            .scan_until(recording(TWO_TAGS), pending(), |event| events.push(event.clone()))
            .await
            .unwrap();

        assert_eq!(discovered(&events), vec!["BB:02"]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].address.as_str(), "BB:02");
        assert_eq!(
            lifecycle(&events),
            vec![
                ScanEvent::Started,
                ScanEvent::Tick { current: 1, max: 2 },
                ScanEvent::Tick { current: 2, max: 2 },
                ScanEvent::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unfiltered_scan_sees_every_tag() {
        let keeper = keeper(2);

        let mut events = Vec::new();
        let results = keeper
            .scan_until(recording(TWO_TAGS), pending(), |event| events.push(event.clone()))
            .await
            .unwrap();

        // aa:01 repeats after the throttle window and is notified twice.
        assert_eq!(discovered(&events), vec!["AA:01", "BB:02", "AA:01"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].signal_strength, -45);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remembering_mid_scan_silences_device() {
        let keeper = keeper(30);
        let radio = ScriptedRadio::new();
        let session = keeper.session(radio.clone());
        let (listener, mut events) = ChannelListener::channel();
        session.bus().subscribe(listener);
        session.start().await.unwrap();

        radio.advertise("AA:01", -60);
        sleep(Duration::from_millis(700)).await;
        keeper.registry().remember_address(address("AA:01"), Some(-60)).unwrap();

        sleep(Duration::from_millis(600)).await;
        radio.advertise("AA:01", -52);
        radio.advertise("BB:02", -70);
        sleep(Duration::from_millis(700)).await;

        assert_eq!(discovered(&events.drain()), vec!["AA:01", "BB:02"]);
        let results = session.results().await.unwrap();
        assert_eq!(results[0].signal_strength, -60);
    }

    // =========================================================================
    // FLOW 2: DISCOVER THEN REMEMBER
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_discovered_device_remembered_then_skipped() {
        let keeper = keeper(2);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        keeper
            .registry()
            .bus()
            .subscribe_fn(move |event: &RegistryEvent| sink.lock().push(event.name()));

        let first = keeper
            .scan_until(recording(TWO_TAGS), pending(), |_| {})
            .await
            .unwrap();
        let wallet = first.iter().find(|r| r.address.as_str() == "BB:02").unwrap();
        let remembered = keeper.registry().remember_result(wallet).unwrap();
        assert_eq!(remembered.last_signal_strength, Some(-71));
        assert_eq!(*changes.lock(), vec!["added", "changed"]);

        let second = keeper
            .scan_until(recording(TWO_TAGS), pending(), |_| {})
            .await
            .unwrap();
        let seen: Vec<_> = second.iter().map(|r| r.address.to_string()).collect();
        assert_eq!(seen, vec!["AA:01"]);

        keeper.registry().forget(&remembered.address).unwrap();
        let third = keeper
            .scan_until(recording(TWO_TAGS), pending(), |_| {})
            .await
            .unwrap();
        assert_eq!(third.len(), 2);
    }

    // =========================================================================
    // FLOW 3: SHUTDOWN
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_scan_early() {
        let keeper = keeper(30);
        let radio = ScriptedRadio::new();

        let mut events = Vec::new();
        keeper
            .scan_until(
                radio.clone(),
                sleep(Duration::from_millis(1500)),
                |event| events.push(event.clone()),
            )
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![
                ScanEvent::Started,
                ScanEvent::Tick { current: 1, max: 30 },
                ScanEvent::Stopped,
            ]
        );
        assert_eq!(radio.starts(), 1);
        assert_eq!(radio.stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_discovery_is_still_delivered() {
        let keeper = keeper(2);
        let radio = recording(r#"{"at_ms": 1800, "address": "CC:03", "rssi": -80}"#);

        let mut events = Vec::new();
        let results = keeper
            .scan_until(radio, pending(), |event| events.push(event.clone()))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(events.iter().filter(|e| **e == ScanEvent::Stopped).count(), 1);
        assert!(matches!(
            events.last(),
            Some(ScanEvent::NewDeviceDiscovered(result)) if result.address.as_str() == "CC:03"
        ));
    }
}
