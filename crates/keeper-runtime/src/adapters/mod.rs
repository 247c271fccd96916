//! # Runtime Adapters
//!
//! Port implementations that need both components or the host.
//!
//! - `membership`: the registry as the scan session's membership port
//! - `replay`: recorded advertisements as a radio

pub mod membership;
pub mod replay;

pub use membership::RegistryMembershipAdapter;
pub use replay::{ReplayEntry, ReplayError, ReplayRadio};
