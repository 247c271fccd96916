//! # Default Adapters
//!
//! Collaborators for hosts that have no platform permission model or no
//! device registry to consult.

use crate::ports::{Authorization, PermissionProvider, RegistryMembership};
use shared_types::DeviceAddress;

/// Permission provider for platforms without a scan permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionProvider for AlwaysGranted {
    fn check_authorization(&self) -> Authorization {
        Authorization::Granted
    }
}

/// Membership that never reports a device as remembered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl RegistryMembership for NoRegistry {
    fn is_remembered(&self, _address: &DeviceAddress) -> bool {
        false
    }
}
