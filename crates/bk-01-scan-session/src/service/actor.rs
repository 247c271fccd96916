//! Session actor: owns all mutable session state.

use super::{clock, Command};
use crate::domain::{ResultSet, ScanConfig, ScanError, SessionState};
use crate::ports::{AdvertisementSink, Authorization, PermissionProvider, RadioScanner, RegistryMembership};
use shared_bus::{ObserverBus, ScanEvent};
use shared_types::{Diagnostics, RawAdvertisement, ScanResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Collaborators the actor calls into.
pub(super) struct Collaborators {
    pub radio: Arc<dyn RadioScanner>,
    pub permission: Arc<dyn PermissionProvider>,
    pub membership: Arc<dyn RegistryMembership>,
    pub diagnostics: Arc<dyn Diagnostics>,
}

pub(super) struct SessionActor {
    state: SessionState,
    tick: u32,
    /// Bumped on every start and stop; clock messages of older sessions are ignored.
    generation: u64,
    results: ResultSet,
    clock: Option<JoinHandle<()>>,
    config: ScanConfig,
    ports: Collaborators,
    bus: Arc<ObserverBus<ScanEvent>>,
    /// Weak so the actor ends once every handle and sink is gone.
    commands: mpsc::WeakUnboundedSender<Command>,
}

impl SessionActor {
    pub(super) fn new(
        config: ScanConfig,
        ports: Collaborators,
        bus: Arc<ObserverBus<ScanEvent>>,
        commands: mpsc::WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            tick: 0,
            generation: 0,
            results: ResultSet::new(config.throttle_window()),
            clock: None,
            config,
            ports,
            bus,
            commands,
        }
    }

    pub(super) async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = inbox.recv().await {
            self.handle(command);
        }

        if self.state.is_scanning() {
            self.ports.radio.stop_scan();
            self.disarm_clock();
        }
        debug!("Scan session task finished");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start { reply } => {
                let _ = reply.send(self.start());
            }
            Command::Stop { reply } => {
                self.stop();
                let _ = reply.send(());
            }
            Command::State { reply } => {
                let _ = reply.send(self.state);
            }
            Command::Ticks { reply } => {
                let _ = reply.send(self.tick);
            }
            Command::Results { reply } => {
                let _ = reply.send(self.results.snapshot());
            }
            Command::Advertisement(advertisement) => self.on_advertisement(advertisement),
            Command::Tick { generation } => self.on_tick(generation),
            Command::Timeout { generation } => self.on_timeout(generation),
            Command::Notify(result) => self.notify_discovered(result),
        }
    }

    fn start(&mut self) -> Result<(), ScanError> {
        if self.state.is_scanning() {
            debug!(generation = self.generation, "Start ignored: already scanning");
            return Ok(());
        }

        if self.ports.permission.check_authorization() == Authorization::RequestPending {
            warn!("Scan not authorized, permission request pending");
            return Err(ScanError::PermissionDenied);
        }

        let commands = self.commands.upgrade().ok_or(ScanError::SessionClosed)?;

        self.results.clear();
        self.tick = 0;
        self.generation += 1;
        self.state = SessionState::Scanning;
        info!(
            generation = self.generation,
            max_ticks = self.config.max_ticks,
            "Scan session started"
        );
        self.bus.publish(&ScanEvent::Started);

        self.clock = Some(clock::arm(
            commands.clone(),
            self.generation,
            self.config.tick_interval(),
            self.config.max_ticks,
        ));

        if let Err(e) = self.ports.radio.start_scan(AdvertisementSink::new(commands)) {
            warn!(error = %e, "Radio failed to start scanning");
            self.ports.diagnostics.report_error(&e, true);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if !self.state.is_scanning() {
            trace!("Stop ignored: session idle");
            return;
        }

        self.ports.radio.stop_scan();
        self.state = SessionState::Idle;
        self.generation += 1;
        self.disarm_clock();
        info!(ticks = self.tick, devices = self.results.len(), "Scan session stopped");
        self.bus.publish(&ScanEvent::Stopped);
    }

    fn disarm_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.abort();
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.generation || !self.state.is_scanning() {
            trace!(generation, current = self.generation, "Stale tick dropped");
            return;
        }
        self.tick += 1;
        trace!(tick = self.tick, max = self.config.max_ticks, "Scan tick");
        self.bus.publish(&ScanEvent::Tick {
            current: self.tick,
            max: self.config.max_ticks,
        });
    }

    fn on_timeout(&mut self, generation: u64) {
        if generation != self.generation {
            trace!(generation, "Stale timeout dropped");
            return;
        }
        debug!(ticks = self.tick, "Scan duration reached");
        self.stop();
    }

    fn on_advertisement(&mut self, advertisement: RawAdvertisement) {
        if !self.state.is_scanning() {
            trace!(address = %advertisement.address, "Advertisement outside session dropped");
            return;
        }

        let Some(address) = advertisement.device_address() else {
            debug!(raw = %advertisement.address, "Advertisement without usable address dropped");
            return;
        };

        if self.ports.membership.is_remembered(&address) {
            trace!(address = %address, "Remembered device skipped");
            return;
        }

        let now = tokio::time::Instant::now().into_std();
        let Some(result) = self.results.intake(address, &advertisement, now).into_notification() else {
            return;
        };

        match self.commands.upgrade() {
            Some(commands) => {
                clock::notify_later(commands, self.config.notify_delay(), result);
            }
            None => debug!("Session closing, discovery notification dropped"),
        }
    }

    fn notify_discovered(&self, result: ScanResult) {
        debug!(
            address = %result.address,
            rssi = result.signal_strength,
            "Device discovered"
        );
        self.bus.publish(&ScanEvent::NewDeviceDiscovered(result));
    }
}
