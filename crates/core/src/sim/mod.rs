//! Simulation harness: memory model and the top-level run loop.

/// Fixed-latency memory model.
pub mod memory;
/// Top-level simulator.
pub mod simulator;

pub use memory::MemoryModel;
pub use simulator::{SimOutcome, Simulator};
