//! # Legacy Store Flows
//!
//! The registry keeps two stores side by side in the data directory:
//!
//! ```text
//! devices.v2  ← current records (the registry's truth)
//! devices.v1  ← legacy records, merged on every save, never shrinks
//! ```
//!
//! These flows run against [`FileStorage`](bk_02_device_registry::FileStorage)
//! and rebuild the application between steps, the way a user upgrading or
//! restarting the app would.

#[cfg(test)]
mod tests {
    use bk_02_device_registry::test_utils::{legacy_record, read_current, read_legacy, write_legacy};
    use bk_02_device_registry::{FileStorage, LegacyRecovery, RegistryConfig, StorageBackend};
    use keeper_runtime::{AppConfig, BeaconKeeper};
    use shared_types::{DeviceAddress, RecordingDiagnostics, TagColor};
    use std::path::Path;
    use std::sync::Arc;

    const PRIMARY: &str = "devices.v2";
    const LEGACY: &str = "devices.v1";

    fn config(dir: &Path) -> AppConfig {
        AppConfig {
            registry: RegistryConfig::in_dir(dir),
            ..AppConfig::default()
        }
    }

    fn address(raw: &str) -> DeviceAddress {
        DeviceAddress::parse(raw).unwrap()
    }

    fn addresses<T: AsRef<DeviceAddress>>(items: &[T]) -> Vec<String> {
        items.iter().map(|item| item.as_ref().to_string()).collect()
    }

    #[test]
    fn test_registry_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let keeper = BeaconKeeper::new(config(dir.path()));
            keeper.registry().remember_address(address("AA:01"), Some(-50)).unwrap();
            keeper.registry().remember_address(address("BB:02"), None).unwrap();
        }

        let keeper = BeaconKeeper::new(config(dir.path()));
        assert_eq!(addresses(&keeper.registry().devices()), vec!["AA:01", "BB:02"]);
        assert_eq!(
            keeper.registry().find(address("AA:01")).unwrap().last_signal_strength,
            Some(-50)
        );
    }

    #[test]
    fn test_attributes_return_after_forget_and_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let keeper = BeaconKeeper::new(config(dir.path()));
            let registry = keeper.registry();
            let mut keys = registry.remember_address(address("AA:01"), None).unwrap();
            keys.alias = Some("Keys".into());
            keys.color = TagColor::Red;
            keys.alert_on_disconnect = true;
            assert!(registry.update(keys));
            registry.forget(address("AA:01")).unwrap();
            assert!(registry.is_empty());
        }

        let keeper = BeaconKeeper::new(config(dir.path()));
        assert!(keeper.registry().is_empty());

        let keys = keeper.registry().remember_address(address("aa:01"), None).unwrap();
        assert_eq!(keys.alias.as_deref(), Some("Keys"));
        assert_eq!(keys.color, TagColor::Red);
        assert!(keys.alert_on_disconnect);
    }

    #[test]
    fn test_upgrade_from_legacy_install() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        write_legacy(
            &storage,
            LEGACY,
            &[
                legacy_record("CC:03", "Wallet", TagColor::Gold, false),
                legacy_record("DD:04", "Bag", TagColor::Blue, true),
            ],
        )
        .unwrap();

        let keeper = BeaconKeeper::new(config(dir.path()));
        // Legacy records are not remembered devices until the user says so.
        assert!(keeper.registry().is_empty());
        assert!(storage.read_all(PRIMARY).unwrap_err().is_not_found());

        let wallet = keeper.registry().remember_address(address("CC:03"), Some(-66)).unwrap();
        assert_eq!(wallet.alias.as_deref(), Some("Wallet"));
        assert_eq!(wallet.color, TagColor::Gold);

        assert_eq!(addresses(&read_current(&storage, PRIMARY).unwrap()), vec!["CC:03"]);
        let legacy = read_legacy(&storage, LEGACY).unwrap();
        assert_eq!(addresses(&legacy), vec!["CC:03", "DD:04"]);
        assert_eq!(legacy[0].alias.as_deref(), Some("Wallet"));
    }

    #[test]
    fn test_corrupt_legacy_store_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write_all(LEGACY, b"not a record file").unwrap();
        let diagnostics = Arc::new(RecordingDiagnostics::new());

        let keeper = BeaconKeeper::with_storage(
            config(dir.path()),
            FileStorage::new(dir.path()),
            diagnostics.clone(),
        );
        let device = keeper.registry().remember_address(address("AA:01"), None).unwrap();

        assert_eq!(device.alias, None);
        assert_eq!(addresses(&read_current(&storage, PRIMARY).unwrap()), vec!["AA:01"]);
        assert!(storage.read_all(LEGACY).unwrap_err().is_not_found());
        assert_eq!(diagnostics.errors().len(), 1);

        // The next save starts a fresh legacy store.
        keeper.registry().remember_address(address("BB:02"), None).unwrap();
        assert_eq!(
            addresses(&read_legacy(&storage, LEGACY).unwrap()),
            vec!["AA:01", "BB:02"]
        );
    }

    #[test]
    fn test_corrupt_legacy_store_kept_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write_all(LEGACY, b"not a record file").unwrap();

        let mut config = config(dir.path());
        config.registry.legacy_recovery = LegacyRecovery::Keep;
        let keeper = BeaconKeeper::new(config);
        keeper.registry().remember_address(address("AA:01"), None).unwrap();

        assert_eq!(storage.read_all(LEGACY).unwrap(), b"not a record file");
        assert_eq!(addresses(&read_current(&storage, PRIMARY).unwrap()), vec!["AA:01"]);
    }
}
