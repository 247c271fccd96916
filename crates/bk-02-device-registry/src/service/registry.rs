use crate::adapters::RecordCodec;
use crate::domain::{
    find_legacy, merge_into_legacy, LegacyDeviceRecord, LegacyRecovery, RegistryConfig,
    RegistryError,
};
use crate::ports::StorageBackend;
use parking_lot::{Mutex, MutexGuard};
use shared_bus::{ObserverBus, RegistryEvent};
use shared_types::{
    DeviceAddress, Diagnostics, RawAdvertisement, RememberedDevice, ScanResult, SystemTimeSource,
    TimeSource, TracingDiagnostics, EVENT_FORGET, EVENT_REMEMBER,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

type Snapshot = Option<Vec<RememberedDevice>>;

/// Durable list of remembered devices.
///
/// The snapshot is loaded from the primary store on first access and
/// written back after every mutation. Each successful write is followed by
/// the legacy merge (see [`merge_into_legacy`]).
///
/// Storage failures never escape: they are reported to diagnostics and the
/// in-memory snapshot stays authoritative.
///
/// # Example
///
/// ```rust,ignore
/// let registry = DeviceRegistry::new(FileStorage::new(&config.data_dir), config);
/// registry.bus().subscribe_fn(|event: &RegistryEvent| println!("{}", event.name()));
///
/// if let Some(device) = registry.remember(&advertisement) {
///     println!("remembered {}", device.display_name());
/// }
/// ```
pub struct DeviceRegistry<S> {
    storage: S,
    config: RegistryConfig,
    devices: Mutex<Snapshot>,
    bus: Arc<ObserverBus<RegistryEvent>>,
    diagnostics: Arc<dyn Diagnostics>,
    time_source: Arc<dyn TimeSource>,
}

impl<S: StorageBackend> DeviceRegistry<S> {
    /// Create a registry over `storage`. Nothing is read until first use.
    pub fn new(storage: S, config: RegistryConfig) -> Self {
        Self {
            storage,
            config,
            devices: Mutex::new(None),
            bus: Arc::new(ObserverBus::new()),
            diagnostics: Arc::new(TracingDiagnostics),
            time_source: Arc::new(SystemTimeSource),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Publish on an existing bus instead of a fresh one.
    #[must_use]
    pub fn with_bus(mut self, bus: Arc<ObserverBus<RegistryEvent>>) -> Self {
        self.bus = bus;
        self
    }

    /// Bus carrying `Added`/`Removed`/`Changed`.
    pub fn bus(&self) -> &Arc<ObserverBus<RegistryEvent>> {
        &self.bus
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Snapshot of all remembered devices, in remember order.
    pub fn devices(&self) -> Vec<RememberedDevice> {
        self.loaded().as_ref().cloned().unwrap_or_default()
    }

    /// Whether a device with this address is remembered.
    pub fn has(&self, address: impl AsRef<DeviceAddress>) -> bool {
        let address = address.as_ref();
        self.loaded()
            .as_ref()
            .is_some_and(|devices| devices.iter().any(|d| &d.address == address))
    }

    /// Whether the advertiser is remembered. Unresolvable addresses never are.
    pub fn has_advertiser(&self, advertisement: &RawAdvertisement) -> bool {
        advertisement
            .device_address()
            .is_some_and(|address| self.has(address))
    }

    /// The remembered device with this address.
    pub fn find(&self, address: impl AsRef<DeviceAddress>) -> Option<RememberedDevice> {
        let address = address.as_ref();
        self.loaded()
            .as_ref()
            .and_then(|devices| devices.iter().find(|d| &d.address == address).cloned())
    }

    pub fn len(&self) -> usize {
        self.loaded().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Remember the device behind a raw advertisement.
    ///
    /// Returns the new record, or `None` if the address is unresolvable or
    /// already remembered.
    pub fn remember(&self, advertisement: &RawAdvertisement) -> Option<RememberedDevice> {
        let Some(address) = advertisement.device_address() else {
            debug!(raw = %advertisement.address, "Remember ignored: unresolvable address");
            return None;
        };
        self.remember_address(address, Some(advertisement.signal_strength))
    }

    /// Remember a device discovered by a scan session.
    pub fn remember_result(&self, result: &ScanResult) -> Option<RememberedDevice> {
        self.remember_address(result.address.clone(), Some(result.signal_strength))
    }

    /// Remember `address`, seeding user attributes from the legacy store.
    pub fn remember_address(
        &self,
        address: DeviceAddress,
        signal_strength: Option<i16>,
    ) -> Option<RememberedDevice> {
        let device = {
            let mut guard = self.loaded();
            let devices = guard.get_or_insert_with(Vec::new);
            if devices.iter().any(|d| d.address == address) {
                debug!(address = %address, "Remember ignored: already remembered");
                return None;
            }

            let mut device = RememberedDevice::new(address, self.time_source.now());
            device.last_signal_strength = signal_strength;
            if let Some(legacy) = self.legacy_record(&device.address) {
                debug!(address = %device.address, "Seeding attributes from legacy record");
                legacy.seed(&mut device);
            }

            devices.push(device.clone());
            self.persist(devices);
            device
        };

        info!(address = %device.address, "Device remembered");
        self.bus.publish(&RegistryEvent::Added(device.clone()));
        self.bus.publish(&RegistryEvent::Changed);
        self.diagnostics.record_event(EVENT_REMEMBER);
        Some(device)
    }

    /// Forget a device. Returns the removed record, `None` if it was absent.
    pub fn forget(&self, address: impl AsRef<DeviceAddress>) -> Option<RememberedDevice> {
        let address = address.as_ref();
        let removed = {
            let mut guard = self.loaded();
            let devices = guard.get_or_insert_with(Vec::new);
            let position = devices.iter().position(|d| &d.address == address)?;
            let removed = devices.remove(position);
            self.persist(devices);
            removed
        };

        info!(address = %removed.address, "Device forgotten");
        self.bus.publish(&RegistryEvent::Removed(removed.clone()));
        self.bus.publish(&RegistryEvent::Changed);
        self.diagnostics.record_event(EVENT_FORGET);
        Some(removed)
    }

    /// Replace the stored record with the same address.
    ///
    /// Returns `false` (no write, no event) if the device is not remembered.
    pub fn update(&self, device: RememberedDevice) -> bool {
        {
            let mut guard = self.loaded();
            let devices = guard.get_or_insert_with(Vec::new);
            let Some(slot) = devices.iter_mut().find(|d| d.address == device.address) else {
                debug!(address = %device.address, "Update ignored: not remembered");
                return false;
            };
            if *slot == device {
                return true;
            }
            *slot = device;
            self.persist(devices);
        }

        self.bus.publish(&RegistryEvent::Changed);
        true
    }

    /// Write the snapshot (and run the legacy merge).
    ///
    /// Returns `false` if the primary store could not be written; the
    /// failure has already been reported.
    pub fn save(&self) -> bool {
        let mut guard = self.loaded();
        let devices = guard.get_or_insert_with(Vec::new);
        self.persist(devices)
    }

    /// Drop the snapshot and load it again from the primary store.
    pub fn reload(&self) {
        let count = {
            let mut guard = self.devices.lock();
            let devices = self.load();
            let count = devices.len();
            *guard = Some(devices);
            count
        };
        debug!(devices = count, "Registry reloaded");
        self.bus.publish(&RegistryEvent::Changed);
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    fn loaded(&self) -> MutexGuard<'_, Snapshot> {
        let mut guard = self.devices.lock();
        if guard.is_none() {
            *guard = Some(self.load());
        }
        guard
    }

    fn load(&self) -> Vec<RememberedDevice> {
        match self.read_primary() {
            Ok(devices) => {
                info!(
                    store = %self.config.primary_store,
                    devices = devices.len(),
                    "Registry loaded"
                );
                devices
            }
            Err(RegistryError::StorageUnavailable(e)) if e.is_not_found() => {
                debug!(store = %self.config.primary_store, "No registry store yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Registry load failed, starting empty");
                self.diagnostics.report_error(&e, true);
                Vec::new()
            }
        }
    }

    fn read_primary(&self) -> Result<Vec<RememberedDevice>, RegistryError> {
        let name = &self.config.primary_store;
        let bytes = self.storage.read_all(name)?;
        let devices: Vec<RememberedDevice> = RecordCodec::CURRENT
            .decode(&bytes)
            .map_err(|e| RegistryError::corrupt(name, e))?;

        let total = devices.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<_> = devices
            .into_iter()
            .filter(|d| seen.insert(d.address.clone()))
            .collect();
        if unique.len() != total {
            warn!(dropped = total - unique.len(), "Duplicate addresses dropped on load");
        }
        Ok(unique)
    }

    fn write_primary(&self, devices: &[RememberedDevice]) -> Result<(), RegistryError> {
        let name = &self.config.primary_store;
        let bytes = RecordCodec::CURRENT
            .encode(devices)
            .map_err(|e| RegistryError::corrupt(name, e))?;
        self.storage.open_or_create(name)?;
        self.storage.write_all(name, &bytes)?;
        Ok(())
    }

    /// Save, then merge into the legacy store. Returns whether the save
    /// itself succeeded.
    fn persist(&self, devices: &[RememberedDevice]) -> bool {
        if let Err(e) = self.write_primary(devices) {
            warn!(error = %e, devices = devices.len(), "Registry save failed");
            self.diagnostics.report_error(&e, true);
            return false;
        }
        debug!(devices = devices.len(), "Registry saved");
        self.migrate_legacy(devices);
        true
    }

    // =========================================================================
    // LEGACY STORE
    // =========================================================================

    fn read_legacy(&self) -> Result<Vec<LegacyDeviceRecord>, RegistryError> {
        let name = &self.config.legacy_store;
        match self.storage.read_all(name) {
            Ok(bytes) => RecordCodec::LEGACY
                .decode(&bytes)
                .map_err(|e| RegistryError::corrupt(name, e)),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn legacy_record(&self, address: &DeviceAddress) -> Option<LegacyDeviceRecord> {
        match self.read_legacy() {
            Ok(legacy) => find_legacy(&legacy, address).cloned(),
            Err(e) => {
                debug!(error = %e, "Legacy store unreadable, no attributes to recover");
                None
            }
        }
    }

    fn migrate_legacy(&self, devices: &[RememberedDevice]) {
        let name = &self.config.legacy_store;
        let legacy = match self.read_legacy() {
            Ok(legacy) => legacy,
            Err(e) => {
                warn!(error = %e, policy = ?self.config.legacy_recovery, "Legacy store unreadable, merge skipped");
                self.diagnostics.report_error(&e, true);
                if self.config.legacy_recovery == LegacyRecovery::Delete {
                    if let Err(e) = self.storage.remove(name) {
                        self.diagnostics.report_error(&RegistryError::from(e), true);
                    }
                }
                return;
            }
        };

        let merged = merge_into_legacy(&legacy, devices);
        let written = RecordCodec::LEGACY
            .encode(&merged)
            .map_err(|e| RegistryError::corrupt(name, e))
            .and_then(|bytes| {
                self.storage.open_or_create(name)?;
                self.storage.write_all(name, &bytes)?;
                Ok(())
            });

        match written {
            Ok(()) => debug!(records = merged.len(), "Legacy store merged"),
            Err(e) => {
                warn!(error = %e, "Legacy merge write failed");
                self.diagnostics.report_error(&e, true);
            }
        }
    }
}

impl<S> std::fmt::Debug for DeviceRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("config", &self.config)
            .field("loaded", &self.devices.lock().as_ref().map(Vec::len))
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
