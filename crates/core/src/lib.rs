//! Trace-driven out-of-order core simulator library.
//!
//! This crate implements a cycle-driven model of an out-of-order processor
//! core fed by a benchmark trace, with the following:
//! 1. **Core:** Reorder buffer, load-store queue, and the trace driver,
//!    modeling in-order dispatch, out-of-order completion, in-order
//!    retirement, and store-to-load forwarding.
//! 2. **Common:** Request/response records, bounded FIFOs, and error types.
//! 3. **Simulation:** Multi-core harness with a fixed-latency memory model
//!    standing in for the external cache hierarchy.
//! 4. **Statistics:** Per-core dispatch, retirement, and memory counters.

/// Common types (messages, FIFOs, errors).
pub mod common;
/// Simulator configuration (defaults, hierarchical config, validation).
pub mod config;
/// Core model (ROB, LSQ, trace driver).
pub mod core;
/// Simulation harness (memory model, run loop).
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// One simulated core; holds the ROB, the LSQ, and the trace driver state.
pub use crate::core::Core;
/// Top-level harness; construct with `Simulator::new` and call `run`.
pub use crate::sim::Simulator;
