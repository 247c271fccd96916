//! # Domain Layer
//!
//! Pure session logic: configuration, lifecycle state, and the in-session
//! result set with its per-address throttle. No I/O, no timers.

pub mod config;
pub mod errors;
pub mod results;
pub mod state;

pub use config::ScanConfig;
pub use errors::ScanError;
pub use results::{Intake, ResultSet};
pub use state::SessionState;
