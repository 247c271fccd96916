//! # Runtime Configuration
//!
//! Layered, last one wins:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`--config`)
//! 3. environment (`BK_DATA_DIR`, `BK_SCAN_TICKS`)
//! 4. command-line flags
//!
//! ```toml
//! [scan]
//! max_ticks = 30
//!
//! [registry]
//! data_dir = "/var/lib/beacon-keeper"
//! legacy_recovery = "delete"
//! ```

use bk_01_scan_session::ScanConfig;
use bk_02_device_registry::RegistryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable overriding `registry.data_dir`.
pub const ENV_DATA_DIR: &str = "BK_DATA_DIR";
/// Environment variable overriding `scan.max_ticks`.
pub const ENV_SCAN_TICKS: &str = "BK_SCAN_TICKS";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub registry: RegistryConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl AppConfig {
    /// Load defaults, then the TOML file at `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparsable values are logged and ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.registry.data_dir = PathBuf::from(dir);
        }
        if let Some(ticks) = lookup(ENV_SCAN_TICKS) {
            match ticks.parse() {
                Ok(ticks) => self.scan.max_ticks = ticks,
                Err(_) => warn!(value = %ticks, "{ENV_SCAN_TICKS} is not a tick count, ignored"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bk_02_device_registry::LegacyRecovery;
    use std::collections::HashMap;

    #[test]
    fn test_no_file_gives_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scan.max_ticks, 30);
    }

    #[test]
    fn test_file_sections_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.toml");
        std::fs::write(
            &path,
            "[scan]\nmax_ticks = 5\n\n[registry]\nlegacy_recovery = \"keep\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.scan.max_ticks, 5);
        assert_eq!(config.scan.notify_delay_ms, 600);
        assert_eq!(config.registry.legacy_recovery, LegacyRecovery::Keep);
        assert_eq!(config.registry.primary_store, "devices.v2");
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.toml");
        std::fs::write(&path, "[scan\n").unwrap();

        assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            AppConfig::load(Some(&dir.path().join("missing.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_DATA_DIR, "/tmp/tags"), (ENV_SCAN_TICKS, "7")].into();
        let mut config = AppConfig::default();

        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.registry.data_dir, PathBuf::from("/tmp/tags"));
        assert_eq!(config.scan.max_ticks, 7);
    }

    #[test]
    fn test_bad_env_value_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_from(|key| (key == ENV_SCAN_TICKS).then(|| "soon".to_string()));
        assert_eq!(config.scan.max_ticks, 30);
    }
}
