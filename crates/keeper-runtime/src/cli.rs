//! Command-line interface.

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Beacon Keeper: discover BLE tags and keep track of the ones you own.
#[derive(Parser, Debug)]
#[command(name = "beacon-keeper", version)]
#[command(about = "Discover BLE tags and manage the remembered-device registry")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the device stores (overrides config and BK_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run one scan session and print discovered devices
    Scan {
        /// JSON-lines recording to play back instead of a live radio
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Session length in ticks
        #[arg(long)]
        ticks: Option<u32>,
    },

    /// List remembered devices
    List,

    /// Remember a device by address
    Remember {
        address: String,

        /// Signal strength to record (dBm)
        #[arg(long, allow_negative_numbers = true)]
        rssi: Option<i16>,
    },

    /// Forget a remembered device
    Forget { address: String },
}

impl Cli {
    /// Apply flag overrides on top of file and environment configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.registry.data_dir.clone_from(dir);
        }
        if let Command::Scan {
            ticks: Some(ticks), ..
        } = self.command
        {
            config.scan.max_ticks = ticks;
        }
    }
}
