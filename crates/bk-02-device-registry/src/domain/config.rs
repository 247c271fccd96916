//! Registry Configuration

use serde::Deserialize;
use std::path::PathBuf;

/// What to do with a legacy store that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRecovery {
    /// Delete the legacy store and skip the merge. It is re-seeded from the
    /// current records on the next save.
    #[default]
    Delete,
    /// Leave the unreadable store in place and skip the merge.
    Keep,
}

/// Storage locations and migration policy of the device registry.
///
/// # Config File Format
///
/// ```toml
/// [registry]
/// data_dir = "/var/lib/beacon-keeper"
/// primary_store = "devices.v2"
/// legacy_store = "devices.v1"
/// legacy_recovery = "delete"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding both stores (file backend only).
    pub data_dir: PathBuf,
    /// Store name of the current registry.
    pub primary_store: String,
    /// Store name of the legacy snapshot.
    pub legacy_store: String,
    pub legacy_recovery: LegacyRecovery,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            primary_store: "devices.v2".to_string(),
            legacy_store: "devices.v1".to_string(),
            legacy_recovery: LegacyRecovery::Delete,
        }
    }
}

impl RegistryConfig {
    /// Default store names rooted at `data_dir`.
    #[must_use]
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}
