//! Session lifecycle state.

use std::fmt;

/// Lifecycle of a scan session.
///
/// There is no separate terminal state: a stopped session is `Idle` again
/// and can be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not scanning.
    #[default]
    Idle,
    /// Radio registered, timers armed.
    Scanning,
}

impl SessionState {
    /// Whether the session is currently scanning.
    pub fn is_scanning(self) -> bool {
        matches!(self, Self::Scanning)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Scanning => write!(f, "Scanning"),
        }
    }
}
