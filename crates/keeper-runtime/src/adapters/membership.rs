//! Registry membership for the scan session.

use bk_01_scan_session::RegistryMembership;
use bk_02_device_registry::{DeviceRegistry, StorageBackend};
use shared_types::DeviceAddress;
use std::sync::Arc;

/// Lets the scan session skip devices the registry already remembers.
pub struct RegistryMembershipAdapter<S> {
    registry: Arc<DeviceRegistry<S>>,
}

impl<S> RegistryMembershipAdapter<S> {
    pub fn new(registry: Arc<DeviceRegistry<S>>) -> Self {
        Self { registry }
    }
}

impl<S: StorageBackend> RegistryMembership for RegistryMembershipAdapter<S> {
    fn is_remembered(&self, address: &DeviceAddress) -> bool {
        self.registry.has(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bk_02_device_registry::{InMemoryStorage, RegistryConfig};
    use shared_types::RawAdvertisement;

    #[test]
    fn test_reflects_registry_contents() {
        let registry = Arc::new(DeviceRegistry::new(InMemoryStorage::new(), RegistryConfig::default()));
        let membership = RegistryMembershipAdapter::new(Arc::clone(&registry));
        let address = DeviceAddress::parse("AA:01").unwrap();

        assert!(!membership.is_remembered(&address));
        registry.remember(&RawAdvertisement::new("AA:01", -50, vec![]));
        assert!(membership.is_remembered(&address));
    }
}
