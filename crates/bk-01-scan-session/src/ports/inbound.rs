//! # Driving Ports (Inbound API)

use crate::domain::{ScanError, SessionState};
use async_trait::async_trait;
use shared_types::ScanResult;

/// Primary API of a scan session.
///
/// Every call is queued onto the session's own task and answered from
/// there, so calls made from different tasks are serialized with each
/// other and with radio deliveries.
#[async_trait]
pub trait ScanSessionApi: Send + Sync {
    /// Start scanning.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if scanning is not authorized; the session stays `Idle`.
    /// - `SessionClosed` if the session task is gone.
    ///
    /// Starting a session that is already scanning is a no-op.
    async fn start(&self) -> Result<(), ScanError>;

    /// Stop scanning. A no-op while `Idle`.
    async fn stop(&self) -> Result<(), ScanError>;

    /// Current lifecycle state.
    async fn state(&self) -> Result<SessionState, ScanError>;

    /// Ticks elapsed in the current (or last) session.
    async fn ticks(&self) -> Result<u32, ScanError>;

    /// Devices seen in the current (or last) session, in discovery order.
    async fn results(&self) -> Result<Vec<ScanResult>, ScanError>;
}
