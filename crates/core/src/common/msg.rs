//! Request and response records exchanged with the memory system.
//!
//! These are the only types that cross the core/cache boundary. It provides:
//! 1. **Request kinds:** Loads, stores, and compute instructions.
//! 2. **Requests:** The record emitted into the cache TX FIFO.
//! 3. **Responses:** The record the cache delivers into the RX FIFO.

use std::fmt;

/// Kind of a dispatched instruction.
///
/// Only `Read` and `Write` ever cross the cache boundary; `Compute`
/// instructions live and die inside the reorder buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReqKind {
    /// Load operation.
    Read,
    /// Store operation.
    Write,
    /// Compute instruction (no memory access).
    #[default]
    Compute,
}

impl ReqKind {
    /// Returns true for loads and stores.
    #[inline]
    pub fn is_mem(self) -> bool {
        self != ReqKind::Compute
    }
}

impl fmt::Display for ReqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReqKind::Read => write!(f, "READ"),
            ReqKind::Write => write!(f, "WRITE"),
            ReqKind::Compute => write!(f, "COMPUTE"),
        }
    }
}

/// A dispatched instruction, as seen by the ROB, the LSQ, and the cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqMsg {
    /// Unique message identifier, assigned at dispatch in program order.
    pub msg_id: u64,
    /// Originating core.
    pub core_id: u16,
    /// Memory address (0 for compute instructions).
    pub addr: u64,
    /// Cycle the instruction was dispatched.
    pub cycle: u64,
    /// Instruction kind.
    pub kind: ReqKind,
}

impl ReqMsg {
    /// Returns true if this request is a load.
    #[inline]
    pub fn is_load(&self) -> bool {
        self.kind == ReqKind::Read
    }

    /// Returns true if this request is a store.
    #[inline]
    pub fn is_store(&self) -> bool {
        self.kind == ReqKind::Write
    }
}

/// A cache response for a previously emitted request.
#[derive(Clone, Copy, Debug)]
pub struct RespMsg {
    /// Identifier of the original request.
    pub msg_id: u64,
    /// Memory address of the original request.
    pub addr: u64,
    /// Cycle the request was dispatched.
    pub req_cycle: u64,
    /// Cycle the response was produced.
    pub resp_cycle: u64,
}
