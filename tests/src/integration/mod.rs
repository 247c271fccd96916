//! # Integration Flows
//!
//! Every flow runs the real crates end to end. Radios are scripted or
//! replayed, time is paused, storage is in memory or a temp directory.

pub mod flows;
pub mod migration;
