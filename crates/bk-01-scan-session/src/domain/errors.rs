//! Domain Errors for the Scan Session

use thiserror::Error;

/// Errors surfaced by scan-session operations.
///
/// Radio failures are not in this list: they are reported to diagnostics
/// and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The permission collaborator has not authorized scanning. The session
    /// stays `Idle`; a permission request may be pending.
    #[error("Scan permission not granted")]
    PermissionDenied,

    /// The session task is gone (runtime shut down).
    #[error("Scan session closed")]
    SessionClosed,
}
