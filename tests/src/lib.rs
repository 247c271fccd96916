//! # Beacon Keeper Test Suite
//!
//! Flows that cross crate boundaries: a scan session filtered by the
//! device registry, and the registry's legacy store surviving restarts.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── component_benchmarks.rs   # intake, codec and bus throughput
//! └── src/integration/
//!     ├── flows.rs                  # scan session + registry
//!     └── migration.rs              # file-backed legacy store
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bk-tests
//! cargo bench -p bk-tests
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod integration;
