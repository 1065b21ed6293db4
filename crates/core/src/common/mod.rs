//! Common types shared across the core and the simulation harness.

/// Fatal error definitions.
pub mod error;
/// Bounded FIFOs and the cache port.
pub mod fifo;
/// Request/response records.
pub mod msg;

pub use error::SimError;
pub use fifo::{BoundedFifo, CachePort};
pub use msg::{ReqKind, ReqMsg, RespMsg};
