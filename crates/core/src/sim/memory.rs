//! Fixed-latency memory model.
//!
//! The real cache hierarchy lives outside the core model; this is the
//! external-world stand-in the harness wires to each core's cache port. It
//! provides:
//! 1. **Acceptance:** Pops at most one TX request per port per cycle.
//! 2. **Delivery:** Answers each request after a fixed latency, in request
//!    order, backing off while the RX FIFO is full.

use std::collections::VecDeque;

use crate::common::fifo::CachePort;
use crate::common::msg::{ReqMsg, RespMsg};

/// Memory model answering every request after `latency` cycles.
pub struct MemoryModel {
    latency: u64,
    /// Accepted requests with their due cycle, one queue per port.
    pending: Vec<VecDeque<(u64, ReqMsg)>>,
}

impl MemoryModel {
    /// Creates a model serving `ports` cache ports.
    pub fn new(latency: u64, ports: usize) -> Self {
        Self {
            latency,
            pending: (0..ports).map(|_| VecDeque::new()).collect(),
        }
    }

    /// One memory cycle over all ports: accept, then deliver what is due.
    pub fn step(&mut self, cycle: u64, ports: &mut [CachePort]) {
        for (queue, port) in self.pending.iter_mut().zip(ports.iter_mut()) {
            if let Some(req) = port.tx.pop() {
                queue.push_back((cycle + self.latency, req));
            }

            while let Some(&(due, req)) = queue.front() {
                if due > cycle || port.rx.is_full() {
                    break;
                }
                port.rx.push(RespMsg {
                    msg_id: req.msg_id,
                    addr: req.addr,
                    req_cycle: req.cycle,
                    resp_cycle: cycle,
                });
                queue.pop_front();
            }
        }
    }

    /// True when no accepted request is still awaiting delivery.
    pub fn is_idle(&self) -> bool {
        self.pending.iter().all(VecDeque::is_empty)
    }
}
