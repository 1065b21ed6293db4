//! Load-Store Queue (LSQ) for memory ordering.
//!
//! The LSQ is a circular buffer holding every in-flight memory operation in
//! dispatch order. It provides:
//! 1. **Allocation:** Appends loads and stores at the tail; stores are born
//!    ready (the pipeline does not stall on them).
//! 2. **Forwarding:** Satisfies loads from the youngest older store to the
//!    same address without touching the cache.
//! 3. **Issue:** Emits the head operation to the cache TX FIFO, preserving
//!    program order at the memory boundary.
//! 4. **Completion:** Integrates cache responses by message id.
//! 5. **Drain:** Removes finished operations from the head forward.

use crate::common::fifo::CachePort;
use crate::common::msg::{ReqKind, ReqMsg, RespMsg};
use crate::core::rob::ReorderBuffer;

/// A single entry in the load-store queue.
#[derive(Clone, Debug, Default)]
pub struct LsqEntry {
    /// The memory operation (always a load or a store).
    pub request: ReqMsg,
    /// Load: data available (forwarded or answered). Store: committed,
    /// which holds from allocation.
    pub ready: bool,
    /// Emitted into the cache TX FIFO and not yet answered.
    pub waiting_for_cache: bool,
    /// The cache acknowledged this store. Stores cannot be dropped before
    /// this, or the ordered drain to memory would be lost.
    pub cache_ack: bool,
    /// Whether this slot is occupied.
    pub valid: bool,
}

impl LsqEntry {
    /// Removal predicate for the in-order drain.
    fn removable(&self) -> bool {
        match self.request.kind {
            ReqKind::Read => self.ready,
            ReqKind::Write => self.cache_ack,
            ReqKind::Compute => false,
        }
    }
}

/// Load-store queue, a circular buffer in dispatch order.
pub struct LoadStoreQueue {
    entries: Vec<LsqEntry>,
    /// Index of the oldest entry (drain and issue point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
    /// Per-cycle trace output to stderr.
    log: bool,
    /// Loads satisfied by store-to-load forwarding.
    pub forward_hits: u64,
    /// Responses whose id matched no entry.
    pub unknown_responses: u64,
}

impl LoadStoreQueue {
    /// Creates an LSQ with the given capacity.
    pub fn new(capacity: usize, log: bool) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, LsqEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
            log,
            forward_hits: 0,
            unknown_responses: 0,
        }
    }

    /// Returns the LSQ capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the LSQ is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if a new entry can be allocated.
    #[inline]
    pub fn can_accept(&self) -> bool {
        self.count < self.entries.len()
    }

    /// Allocates a memory operation at the tail.
    ///
    /// Stores are marked ready and committed into the ROB immediately: the
    /// CPU does not wait for them. Loads run the forwarding check; a load
    /// satisfied by an older store is ready (and ROB-committed) without
    /// ever being sent to the cache.
    ///
    /// Returns false, with no state change, if the queue is full or the
    /// request is not a memory operation.
    pub fn allocate(&mut self, request: ReqMsg, rob: &mut ReorderBuffer) -> bool {
        debug_assert!(request.kind.is_mem());
        if !request.kind.is_mem() || !self.can_accept() {
            if self.log && !self.can_accept() {
                eprintln!("[lsq] full, cannot allocate msg_id={}", request.msg_id);
            }
            return false;
        }

        let is_store = request.is_store();
        self.entries[self.tail] = LsqEntry {
            request,
            ready: is_store,
            waiting_for_cache: false,
            cache_ack: false,
            valid: true,
        };
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;

        if self.log {
            eprintln!(
                "[lsq] allocate {} msg_id={} addr={:#x}",
                request.kind, request.msg_id, request.addr
            );
        }

        if is_store {
            rob.commit(request.msg_id);
        } else {
            self.ld_fwd(request.addr, rob);
        }
        true
    }

    /// Store-to-load forwarding for `addr`.
    ///
    /// Finds the youngest store to `addr` (memory ordering wants the most
    /// recent prior value; stores are born ready, so no readiness check is
    /// needed). Every not-yet-ready load to `addr` strictly younger than
    /// that store becomes ready and is committed into the ROB. Older loads
    /// already have their provenance and are left alone.
    ///
    /// Returns true if a matching store was found. Idempotent: re-running
    /// it in the same cycle promotes nothing further.
    pub fn ld_fwd(&mut self, addr: u64, rob: &mut ReorderBuffer) -> bool {
        let cap = self.entries.len();

        // Youngest matching store, by age from the head.
        let mut store_age = None;
        for age in (0..self.count).rev() {
            let entry = &self.entries[(self.head + age) % cap];
            if entry.valid && entry.request.is_store() && entry.request.addr == addr {
                store_age = Some(age);
                break;
            }
        }
        let Some(store_age) = store_age else {
            return false;
        };

        for age in store_age + 1..self.count {
            let idx = (self.head + age) % cap;
            let entry = &mut self.entries[idx];
            if entry.valid && entry.request.is_load() && entry.request.addr == addr && !entry.ready
            {
                entry.ready = true;
                self.forward_hits += 1;
                let msg_id = entry.request.msg_id;
                if self.log {
                    eprintln!("[lsq] forward hit msg_id={} addr={:#x}", msg_id, addr);
                }
                rob.commit(msg_id);
            }
        }
        true
    }

    /// External ready notification by id. Idempotent; harmless when the id
    /// is not present.
    pub fn commit(&mut self, msg_id: u64) {
        if let Some(entry) = self.find_entry_mut(msg_id) {
            entry.ready = true;
        }
    }

    /// Emits the head operation to the cache, if it needs the cache.
    ///
    /// Head-only, at most one emission per call: a store goes out once it
    /// is ready (always, from allocation), a load only while it is not
    /// satisfied. A forwarded load is never sent. Nothing happens while the
    /// TX FIFO is full or the head is already waiting.
    pub fn push_to_cache(&mut self, port: &mut CachePort) {
        if port.tx.is_full() || self.count == 0 {
            return;
        }
        let head = &mut self.entries[self.head];
        if head.waiting_for_cache {
            return;
        }
        let wants_cache = (head.request.is_store() && head.ready)
            || (head.request.is_load() && !head.ready);
        if !wants_cache {
            return;
        }
        if port.tx.push(head.request) {
            head.waiting_for_cache = true;
            if self.log {
                eprintln!(
                    "[lsq] push {} msg_id={} addr={:#x}",
                    head.request.kind, head.request.msg_id, head.request.addr
                );
            }
        }
    }

    /// Drains at most one response from the cache RX FIFO.
    ///
    /// A load response makes the load ready and commits it into the ROB,
    /// then re-runs forwarding for the address so back-to-back matching
    /// loads keep making progress. A store response sets the ack that
    /// allows the store to drain. A response for an unknown id is counted
    /// and otherwise ignored.
    ///
    /// Returns the consumed response so the driver can observe it.
    pub fn rx_from_cache(
        &mut self,
        rob: &mut ReorderBuffer,
        port: &mut CachePort,
    ) -> Option<RespMsg> {
        let resp = port.rx.pop()?;

        let matched = match self.find_entry_mut(resp.msg_id) {
            Some(entry) => {
                entry.waiting_for_cache = false;
                if entry.request.is_load() {
                    entry.ready = true;
                    Some((true, entry.request.addr, entry.request.msg_id))
                } else {
                    entry.cache_ack = true;
                    Some((false, entry.request.addr, entry.request.msg_id))
                }
            }
            None => None,
        };

        match matched {
            Some((true, addr, msg_id)) => {
                if self.log {
                    eprintln!("[lsq] load answered msg_id={}", msg_id);
                }
                rob.commit(msg_id);
                self.ld_fwd(addr, rob);
            }
            Some((false, _, msg_id)) => {
                if self.log {
                    eprintln!("[lsq] store acked msg_id={}", msg_id);
                }
            }
            None => {
                self.unknown_responses += 1;
                if self.log {
                    eprintln!(
                        "[lsq] warning: response for unknown msg_id={}",
                        resp.msg_id
                    );
                }
            }
        }
        Some(resp)
    }

    /// Removes finished entries from the head forward, stopping at the
    /// first entry that is still live: a load is removable once ready, a
    /// store once the cache acked it.
    pub fn retire(&mut self) {
        while self.count > 0 {
            let head = &self.entries[self.head];
            if !head.removable() {
                break;
            }
            if self.log {
                eprintln!(
                    "[lsq] retire {} msg_id={}",
                    head.request.kind, head.request.msg_id
                );
            }
            self.entries[self.head].valid = false;
            self.head = (self.head + 1) % self.entries.len();
            self.count -= 1;
        }
    }

    /// One LSQ cycle: issue, then receive, then drain.
    ///
    /// Issuing before receiving keeps a same-cycle round trip impossible;
    /// draining last lets a just-answered head leave immediately. Returns
    /// the response consumed this cycle, if any.
    pub fn step(&mut self, rob: &mut ReorderBuffer, port: &mut CachePort) -> Option<RespMsg> {
        self.push_to_cache(port);
        let resp = self.rx_from_cache(rob, port);
        self.retire();
        resp
    }

    /// Retracts the tail entry. Silent on an empty queue.
    pub fn remove_last_entry(&mut self) {
        if self.count == 0 {
            return;
        }
        let last = if self.tail == 0 {
            self.entries.len() - 1
        } else {
            self.tail - 1
        };
        self.entries[last].valid = false;
        self.tail = last;
        self.count -= 1;
    }

    /// Returns true if the entry with `msg_id` exists and is ready.
    pub fn is_ready(&self, msg_id: u64) -> bool {
        self.find_entry(msg_id).is_some_and(|e| e.ready)
    }

    /// Number of entries currently waiting on the cache.
    pub fn waiting_count(&self) -> usize {
        let mut n = 0;
        self.for_each(|e| {
            if e.waiting_for_cache {
                n += 1;
            }
        });
        n
    }

    /// Finds the entry with the given id.
    pub fn find_entry(&self, msg_id: u64) -> Option<&LsqEntry> {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid && self.entries[idx].request.msg_id == msg_id {
                return Some(&self.entries[idx]);
            }
            idx = (idx + 1) % self.entries.len();
        }
        None
    }

    /// Iterates over occupied entries from head (oldest) to tail (youngest).
    pub fn for_each(&self, mut f: impl FnMut(&LsqEntry)) {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid {
                f(&self.entries[idx]);
            }
            idx = (idx + 1) % self.entries.len();
        }
    }

    fn find_entry_mut(&mut self, msg_id: u64) -> Option<&mut LsqEntry> {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid && self.entries[idx].request.msg_id == msg_id {
                return Some(&mut self.entries[idx]);
            }
            idx = (idx + 1) % self.entries.len();
        }
        None
    }
}
