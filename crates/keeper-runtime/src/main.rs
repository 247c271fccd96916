//! # Beacon Keeper
//!
//! Command-line entry point.
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line
//! 2. Initialise logging (`RUST_LOG`, default `info`)
//! 3. Load configuration: defaults → TOML file → environment → flags
//! 4. Assemble the registry and run the requested command

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use keeper_runtime::{AppConfig, BeaconKeeper, Cli, Command, ReplayRadio};
use shared_bus::ScanEvent;
use shared_types::DeviceAddress;

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env();
    cli.apply_overrides(&mut config);
    debug!(?config, "Effective configuration");
    Ok(config)
}

fn parse_address(raw: &str) -> Result<DeviceAddress> {
    DeviceAddress::parse(raw).with_context(|| format!("invalid device address {raw:?}"))
}

fn ctrl_c() -> impl Future<Output = ()> {
    async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = load_config(&cli)?;
    info!(data_dir = %config.registry.data_dir.display(), "Beacon Keeper starting");
    let keeper = BeaconKeeper::new(config);

    match &cli.command {
        Command::Scan { replay, .. } => {
            let radio = match replay {
                Some(path) => ReplayRadio::from_file(path)
                    .with_context(|| format!("loading replay {}", path.display()))?,
                None => ReplayRadio::silent(),
            };

            let results = keeper
                .scan_until(Arc::new(radio), ctrl_c(), |event| match event {
                    ScanEvent::NewDeviceDiscovered(result) => {
                        println!("{}\t{} dBm", result.address, result.signal_strength);
                    }
                    ScanEvent::Tick { current, max } => debug!(current, max, "tick"),
                    ScanEvent::Started | ScanEvent::Stopped => {}
                })
                .await?;
            println!("{} device(s) seen", results.len());
        }

        Command::List => {
            let devices = keeper.registry().devices();
            if devices.is_empty() {
                println!("no remembered devices");
            }
            for device in devices {
                println!(
                    "{}\t{}\t{:?}\talert={}",
                    device.address,
                    device.display_name(),
                    device.color,
                    device.alert_on_disconnect
                );
            }
        }

        Command::Remember { address, rssi } => {
            let address = parse_address(address)?;
            match keeper.registry().remember_address(address.clone(), *rssi) {
                Some(device) => println!("remembered {}", device.display_name()),
                None => println!("{address} is already remembered"),
            }
        }

        Command::Forget { address } => {
            let address = parse_address(address)?;
            match keeper.registry().forget(&address) {
                Some(device) => println!("forgot {}", device.display_name()),
                None => println!("{address} is not remembered"),
            }
        }
    }

    Ok(())
}
