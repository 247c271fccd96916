//! # Beacon Keeper Container
//!
//! Owns the device registry and builds scan sessions wired to it.

use crate::adapters::RegistryMembershipAdapter;
use crate::config::AppConfig;
use bk_01_scan_session::{RadioScanner, ScanError, ScanSession, ScanSessionApi};
use bk_02_device_registry::{DeviceRegistry, FileStorage, StorageBackend};
use shared_bus::{ChannelListener, ScanEvent};
use shared_types::{Diagnostics, ScanResult, TracingDiagnostics};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// The assembled application.
pub struct BeaconKeeper<S = FileStorage> {
    config: AppConfig,
    registry: Arc<DeviceRegistry<S>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl BeaconKeeper<FileStorage> {
    /// Registry stored under `config.registry.data_dir`.
    pub fn new(config: AppConfig) -> Self {
        let storage = FileStorage::new(&config.registry.data_dir);
        Self::with_storage(config, storage, Arc::new(TracingDiagnostics))
    }
}

impl<S: StorageBackend + 'static> BeaconKeeper<S> {
    pub fn with_storage(config: AppConfig, storage: S, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let registry = DeviceRegistry::new(storage, config.registry.clone())
            .with_diagnostics(Arc::clone(&diagnostics));
        Self {
            config,
            registry: Arc::new(registry),
            diagnostics,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry<S>> {
        &self.registry
    }

    /// A new scan session that skips remembered devices.
    pub fn session(&self, radio: Arc<dyn RadioScanner>) -> ScanSession {
        ScanSession::builder(radio)
            .membership(RegistryMembershipAdapter::new(Arc::clone(&self.registry)))
            .diagnostics(Arc::clone(&self.diagnostics))
            .config(self.config.scan.clone())
            .spawn()
    }

    /// Run one session to completion and return what it saw.
    ///
    /// `on_event` sees every scan event, including discoveries whose
    /// delayed notification lands just after the session stopped. When
    /// `shutdown` completes first the session is stopped early.
    pub async fn scan_until(
        &self,
        radio: Arc<dyn RadioScanner>,
        shutdown: impl Future<Output = ()>,
        mut on_event: impl FnMut(&ScanEvent),
    ) -> Result<Vec<ScanResult>, ScanError> {
        let session = self.session(radio);
        let (listener, mut events) = ChannelListener::channel();
        session.bus().subscribe(listener);

        session.start().await?;

        tokio::pin!(shutdown);
        let mut interrupted = false;
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    on_event(&event);
                    if event == ScanEvent::Stopped {
                        break;
                    }
                }
                () = &mut shutdown, if !interrupted => {
                    info!("Scan interrupted");
                    interrupted = true;
                    session.stop().await?;
                }
            }
        }

        tokio::time::sleep(session.config().notify_delay()).await;
        for event in events.drain() {
            on_event(&event);
        }
        session.results().await
    }
}
