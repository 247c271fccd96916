//! # Scan Session Service
//!
//! The session runs as a single tokio task (the actor) that owns all
//! mutable session state. Everything that touches that state arrives as a
//! [`Command`] on one unbounded queue:
//!
//! ```text
//!  ScanSession::start/stop/...  ──┐
//!  AdvertisementSink::deliver   ──┼──→ [command queue] ──→ SessionActor ──→ ObserverBus<ScanEvent>
//!  session clock (tick/timeout) ──┤
//!  delayed discovery notify     ──┘
//! ```
//!
//! Observer callbacks therefore always run on the actor task.

mod actor;
mod clock;
mod command;
mod handle;

pub(crate) use command::Command;
pub use handle::{ScanSession, ScanSessionBuilder};
