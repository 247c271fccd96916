//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** what the application calls
//! - **Driven Ports (Outbound):** what the host must provide (radio,
//!   permission check, registry membership)

pub mod inbound;
pub mod outbound;

pub use inbound::ScanSessionApi;
pub use outbound::{
    AdvertisementSink, Authorization, PermissionProvider, RadioError, RadioScanner,
    RegistryMembership,
};
