use super::actor::{Collaborators, SessionActor};
use super::Command;
use crate::adapters::{AlwaysGranted, NoRegistry};
use crate::domain::{ScanConfig, ScanError, SessionState};
use crate::ports::{AdvertisementSink, PermissionProvider, RadioScanner, RegistryMembership, ScanSessionApi};
use async_trait::async_trait;
use shared_bus::{ObserverBus, ScanEvent};
use shared_types::{Diagnostics, ScanResult, TracingDiagnostics};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Handle to a running scan session.
///
/// Cheap to clone. The session task lives while at least one handle (or an
/// [`AdvertisementSink`] held by the radio) is alive.
///
/// # Example
///
/// ```rust,ignore
/// let session = ScanSession::builder(Arc::new(radio))
///     .membership(RegistryMembershipAdapter::new(registry.clone()))
///     .config(ScanConfig::with_max_ticks(10))
///     .spawn();
///
/// session.bus().subscribe_fn(|event: &ScanEvent| println!("{}", event.name()));
/// session.start().await?;
/// ```
#[derive(Clone)]
pub struct ScanSession {
    commands: mpsc::UnboundedSender<Command>,
    bus: Arc<ObserverBus<ScanEvent>>,
    config: ScanConfig,
}

impl ScanSession {
    /// Start building a session around `radio`.
    pub fn builder(radio: Arc<dyn RadioScanner>) -> ScanSessionBuilder {
        ScanSessionBuilder::new(radio)
    }

    /// Bus carrying this session's lifecycle and discovery events.
    pub fn bus(&self) -> &Arc<ObserverBus<ScanEvent>> {
        &self.bus
    }

    /// Timing configuration the session was spawned with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// A sink feeding this session, for radios that are wired up
    /// out of band. Advertisements delivered while `Idle` are dropped.
    pub fn sink(&self) -> AdvertisementSink {
        AdvertisementSink::new(self.commands.clone())
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ScanError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .map_err(|_| ScanError::SessionClosed)?;
        response.await.map_err(|_| ScanError::SessionClosed)
    }
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("config", &self.config)
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}

#[async_trait]
impl ScanSessionApi for ScanSession {
    async fn start(&self) -> Result<(), ScanError> {
        self.request(|reply| Command::Start { reply }).await?
    }

    async fn stop(&self) -> Result<(), ScanError> {
        self.request(|reply| Command::Stop { reply }).await
    }

    async fn state(&self) -> Result<SessionState, ScanError> {
        self.request(|reply| Command::State { reply }).await
    }

    async fn ticks(&self) -> Result<u32, ScanError> {
        self.request(|reply| Command::Ticks { reply }).await
    }

    async fn results(&self) -> Result<Vec<ScanResult>, ScanError> {
        self.request(|reply| Command::Results { reply }).await
    }
}

/// Builder for [`ScanSession`].
///
/// Only the radio is required. Defaults: every scan is authorized, no
/// device is treated as remembered, errors go to `tracing`, timings from
/// [`ScanConfig::default`].
pub struct ScanSessionBuilder {
    radio: Arc<dyn RadioScanner>,
    permission: Arc<dyn PermissionProvider>,
    membership: Arc<dyn RegistryMembership>,
    diagnostics: Arc<dyn Diagnostics>,
    config: ScanConfig,
    bus: Option<Arc<ObserverBus<ScanEvent>>>,
}

impl ScanSessionBuilder {
    fn new(radio: Arc<dyn RadioScanner>) -> Self {
        Self {
            radio,
            permission: Arc::new(AlwaysGranted),
            membership: Arc::new(NoRegistry),
            diagnostics: Arc::new(TracingDiagnostics),
            config: ScanConfig::default(),
            bus: None,
        }
    }

    #[must_use]
    pub fn permission(mut self, permission: Arc<dyn PermissionProvider>) -> Self {
        self.permission = permission;
        self
    }

    #[must_use]
    pub fn membership(mut self, membership: impl RegistryMembership + 'static) -> Self {
        self.membership = Arc::new(membership);
        self
    }

    #[must_use]
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish on an existing bus instead of a fresh one.
    #[must_use]
    pub fn bus(mut self, bus: Arc<ObserverBus<ScanEvent>>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Spawn the session task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self) -> ScanSession {
        let (commands, inbox) = mpsc::unbounded_channel();
        let bus = self.bus.unwrap_or_default();

        let actor = SessionActor::new(
            self.config.clone(),
            Collaborators {
                radio: self.radio,
                permission: self.permission,
                membership: self.membership,
                diagnostics: self.diagnostics,
            },
            Arc::clone(&bus),
            commands.downgrade(),
        );
        tokio::spawn(actor.run(inbox));

        ScanSession {
            commands,
            bus,
            config: self.config,
        }
    }
}
