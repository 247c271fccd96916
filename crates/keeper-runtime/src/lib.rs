//! # Keeper Runtime Library
//!
//! Wiring for the `beacon-keeper` binary, exposed as a library for the
//! integration tests.
//!
//! ```text
//! radio ──→ ScanSession ──(membership)──→ DeviceRegistry ──→ FileStorage
//!               │                              │
//!               └──→ ScanEvent bus             └──→ RegistryEvent bus
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;

pub use adapters::{RegistryMembershipAdapter, ReplayEntry, ReplayError, ReplayRadio};
pub use app::BeaconKeeper;
pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError};
