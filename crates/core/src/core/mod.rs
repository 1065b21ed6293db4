//! Out-of-order core model.
//!
//! This module contains the three structures of one simulated core and the
//! driver that feeds them. It provides:
//! 1. **ReorderBuffer:** In-order retirement over out-of-order completion.
//! 2. **LoadStoreQueue:** Memory ordering and store-to-load forwarding.
//! 3. **Trace:** Benchmark trace reading and parsing.
//! 4. **Core:** The per-cycle driver tying dispatch, completion, and
//!    termination together.

/// Load-store queue.
pub mod lsq;
/// Reorder buffer.
pub mod rob;
/// Trace file reading.
pub mod trace;

use crate::common::error::SimError;
use crate::common::fifo::CachePort;
use crate::common::msg::{ReqKind, ReqMsg, RespMsg};
use crate::config::Config;
use crate::core::lsq::LoadStoreQueue;
use crate::core::rob::ReorderBuffer;
use crate::core::trace::TraceReader;
use crate::stats::CoreStats;

/// A parsed memory operation waiting for its dispatch slot.
#[derive(Clone, Copy, Debug)]
struct PendingOp {
    addr: u64,
    kind: ReqKind,
}

/// One simulated core: trace driver, reorder buffer, and load-store queue.
///
/// The core steps once per global cycle in a fixed stage order: ROB
/// retirement, LSQ issue/receive/drain, trace dispatch, then response
/// observation and the termination check. The cache interface is passed in
/// each cycle; the core never owns it.
pub struct Core {
    core_id: u16,
    max_ooo_requests: u32,
    count_compute_in_flight: bool,
    log: bool,

    cycle: u64,
    next_msg_id: u64,
    /// Compute instructions left in the current group.
    remaining_compute: u32,
    /// Memory operation of the current group, not yet dispatched.
    pending_mem: Option<PendingOp>,
    trace: TraceReader,
    trace_done: bool,
    /// Memory requests dispatched and not yet answered by the cache.
    in_flight: u32,
    done: bool,

    /// Reorder buffer.
    pub rob: ReorderBuffer,
    /// Load-store queue.
    pub lsq: LoadStoreQueue,

    stats: CoreStats,
}

impl Core {
    /// Creates a core reading the given trace. Opening the trace is the
    /// only fallible part of construction.
    pub fn new(core_id: u16, trace_path: &str, config: &Config) -> Result<Self, SimError> {
        let log = config.general.log_enabled;
        Ok(Self {
            core_id,
            max_ooo_requests: config.core.max_ooo_requests,
            count_compute_in_flight: config.core.count_compute_in_flight,
            log,
            cycle: 0,
            next_msg_id: 0,
            remaining_compute: 0,
            pending_mem: None,
            trace: TraceReader::open(trace_path, log)?,
            trace_done: false,
            in_flight: 0,
            done: false,
            rob: ReorderBuffer::new(config.core.rob_entries, config.core.ipc, log),
            lsq: LoadStoreQueue::new(config.core.lsq_entries, log),
            stats: CoreStats::default(),
        })
    }

    /// Returns this core's id.
    #[inline]
    pub fn core_id(&self) -> u16 {
        self.core_id
    }

    /// Current local cycle.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Memory requests dispatched and not yet answered.
    #[inline]
    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// True once the trace is drained and all work has completed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True once the trace stream is exhausted.
    #[inline]
    pub fn trace_done(&self) -> bool {
        self.trace_done
    }

    /// Statistics snapshot, merged with the component counters.
    pub fn stats(&self) -> CoreStats {
        let mut stats = self.stats.clone();
        stats.forward_hits = self.lsq.forward_hits;
        stats.unknown_responses = self.lsq.unknown_responses;
        stats.skipped_lines = self.trace.skipped_lines;
        stats
    }

    /// Advances the core by one cycle. A no-op once the core is done.
    pub fn step(&mut self, port: &mut CachePort) {
        if self.done {
            return;
        }
        if self.log {
            eprintln!(
                "[core {}] cycle {} rob={} lsq={} in_flight={}",
                self.core_id,
                self.cycle,
                self.rob.len(),
                self.lsq.len(),
                self.in_flight
            );
        }

        // 1. Retirement frees head slots before anything dispatches.
        let retired = self.rob.step();
        self.stats.retired += retired.len() as u64;
        if self.count_compute_in_flight {
            let computes = retired
                .iter()
                .filter(|e| e.request.kind == ReqKind::Compute)
                .count() as u32;
            self.in_flight = self.in_flight.saturating_sub(computes);
        }

        // 2. Memory pipeline: issue, receive, drain.
        let resp = self.lsq.step(&mut self.rob, port);

        // 3. Dispatch from the trace.
        self.process_tx();

        // 4. Observe the consumed response and check for termination.
        self.process_rx(resp);

        self.cycle += 1;
        self.stats.cycles = self.cycle;
    }

    /// TX stage: group refill, compute burst, then the memory operation.
    fn process_tx(&mut self) {
        // Read the next group once the current one is fully dispatched.
        if self.remaining_compute == 0 && self.pending_mem.is_none() && !self.trace_done {
            match self.trace.next_group() {
                Some(rec) => {
                    self.remaining_compute = rec.compute_count;
                    self.pending_mem = Some(PendingOp {
                        addr: rec.addr,
                        kind: rec.kind,
                    });
                }
                None => {
                    self.trace_done = true;
                    if self.log {
                        eprintln!("[core {}] trace drained", self.core_id);
                    }
                }
            }
        }

        // Compute burst: one instruction per cycle, born ready. The memory
        // operation is held back until the burst is drained.
        if self.remaining_compute > 0 {
            if self.rob.can_accept() {
                let req = self.next_request(ReqKind::Compute, 0);
                if self.rob.allocate(req) {
                    self.remaining_compute -= 1;
                    self.stats.computes += 1;
                    self.stats.requests += 1;
                    if self.count_compute_in_flight {
                        self.in_flight += 1;
                    }
                }
            }
            return;
        }

        // Memory operation: co-allocate into ROB then LSQ. On LSQ refusal
        // the ROB entry is retracted and the dispatch retried next cycle.
        if let Some(op) = self.pending_mem {
            if self.in_flight >= self.max_ooo_requests || !self.rob.can_accept() {
                return;
            }
            let req = self.next_request(op.kind, op.addr);
            if !self.rob.allocate(req) {
                return;
            }
            if self.lsq.allocate(req, &mut self.rob) {
                self.pending_mem = None;
                self.stats.requests += 1;
                match op.kind {
                    ReqKind::Read => self.stats.loads += 1,
                    ReqKind::Write => self.stats.stores += 1,
                    ReqKind::Compute => {}
                }
                // A load satisfied by forwarding at allocation never
                // reaches the cache, so it takes no in-flight slot.
                if req.is_store() || !self.lsq.is_ready(req.msg_id) {
                    self.in_flight += 1;
                }
            } else {
                self.rob.remove_last_entry();
                self.stats.rollbacks += 1;
                if self.log {
                    eprintln!(
                        "[core {}] lsq refused msg_id={}, rolled back rob",
                        self.core_id, req.msg_id
                    );
                }
            }
        }
    }

    /// RX stage: account the response the LSQ consumed this cycle, then
    /// test the termination predicate.
    fn process_rx(&mut self, resp: Option<RespMsg>) {
        if let Some(resp) = resp {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.stats.responses += 1;
            self.stats.last_resp_cycle = resp.resp_cycle;
        }

        if self.trace_done && self.in_flight == 0 && self.rob.is_empty() && self.lsq.is_empty() {
            self.done = true;
            self.stats.finish_cycle = self.cycle;
            if self.log {
                eprintln!(
                    "[core {}] simulation done at cycle {}",
                    self.core_id, self.cycle
                );
            }
        }
    }

    fn next_request(&mut self, kind: ReqKind, addr: u64) -> ReqMsg {
        let msg_id = self.next_msg_id;
        self.next_msg_id += 1;
        ReqMsg {
            msg_id,
            core_id: self.core_id,
            addr,
            cycle: self.cycle,
            kind,
        }
    }
}
