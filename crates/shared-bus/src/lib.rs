//! # Shared Bus - Observer Bus for Beacon Keeper
//!
//! Both the scan session and the device registry announce what they do
//! through an [`ObserverBus`]: one bus per component, one tagged event enum
//! per bus.
//!
//! ```text
//! ┌──────────────┐   publish(&event)   ┌──────────────┐
//! │ Scan Session │ ──────────────────→ │ ObserverBus  │ ──→ listener 1
//! │   Registry   │                     │ <ScanEvent>  │ ──→ listener 2
//! └──────────────┘                     └──────────────┘ ──→ ...
//! ```
//!
//! ## Delivery Rules
//!
//! - Delivery is synchronous, on the publisher's execution context.
//! - Listeners are called in subscription order.
//! - Publish iterates a snapshot, so a listener may subscribe or
//!   unsubscribe (itself or others) from inside its callback.
//! - Duplicate subscribe / unknown unsubscribe trips a debug assertion and
//!   is ignored in release builds.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod observer;
pub mod subscriber;

pub use events::{RegistryEvent, ScanEvent};
pub use observer::{EventListener, ListenerHandle, ObserverBus};
pub use subscriber::{ChannelListener, EventStream};
