//! Reorder Buffer (ROB) for in-order retirement.
//!
//! The ROB is a circular buffer that tracks every dispatched instruction
//! from allocation through retirement. It provides:
//! 1. **Allocation:** Appends instructions at the tail in dispatch order.
//! 2. **Commit:** Marks an instruction's result as known.
//! 3. **In-order Retirement:** Pops ready instructions from the head, up to
//!    IPC per cycle.
//! 4. **Rollback:** Retracts the tail entry when a paired LSQ allocation
//!    fails.

use crate::common::msg::{ReqKind, ReqMsg};

/// A single entry in the reorder buffer.
#[derive(Clone, Debug, Default)]
pub struct RobEntry {
    /// The dispatched instruction.
    pub request: ReqMsg,
    /// Result known; architectural state may advance past this instruction.
    /// Monotonic: once set it stays set for the entry's lifetime.
    pub ready: bool,
    /// Whether this slot is occupied.
    pub valid: bool,
}

/// Reorder buffer, a circular queue retiring from the head in program order.
pub struct ReorderBuffer {
    entries: Vec<RobEntry>,
    /// Index of the oldest entry (retire point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
    /// Maximum retirements per cycle.
    ipc: u32,
    /// Per-cycle trace output to stderr.
    log: bool,
}

impl ReorderBuffer {
    /// Creates a ROB with the given capacity and retire rate.
    pub fn new(capacity: usize, ipc: u32, log: bool) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, RobEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
            ipc,
            log,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if a new entry can be allocated.
    #[inline]
    pub fn can_accept(&self) -> bool {
        self.count < self.entries.len()
    }

    /// Allocates an entry at the tail. Compute instructions are born ready;
    /// memory operations become ready through [`commit`](Self::commit).
    /// Returns false, with no state change, when the ROB is full.
    pub fn allocate(&mut self, request: ReqMsg) -> bool {
        if !self.can_accept() {
            if self.log {
                eprintln!("[rob] full, cannot allocate msg_id={}", request.msg_id);
            }
            return false;
        }

        let ready = request.kind == ReqKind::Compute;
        self.entries[self.tail] = RobEntry {
            request,
            ready,
            valid: true,
        };
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;

        if self.log {
            eprintln!(
                "[rob] allocate {} msg_id={} ready={}",
                request.kind, request.msg_id, ready
            );
        }
        true
    }

    /// Marks the entry with `msg_id` ready. A commit for an id that is no
    /// longer present is a warning, not an error: a forwarded load may
    /// retire before a late response shows up.
    pub fn commit(&mut self, msg_id: u64) {
        if let Some(entry) = self.find_entry_mut(msg_id) {
            entry.ready = true;
        } else if self.log {
            eprintln!("[rob] warning: commit for unknown msg_id={}", msg_id);
        }
    }

    /// Retracts the tail entry. Used to roll back a failed co-allocation.
    /// Silent on an empty buffer.
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

    /// Retires ready entries from the head, in program order, up to IPC.
    /// Stops at the first non-ready head. Returns the retired entries.
    pub fn step(&mut self) -> Vec<RobEntry> {
        let mut retired = Vec::new();
        while self.count > 0 && (retired.len() as u32) < self.ipc {
            if !self.entries[self.head].ready {
                break;
            }
            let entry = self.entries[self.head].clone();
            self.entries[self.head].valid = false;
            self.head = (self.head + 1) % self.entries.len();
            self.count -= 1;
            if self.log {
                eprintln!(
                    "[rob] retire {} msg_id={}",
                    entry.request.kind, entry.request.msg_id
                );
            }
            retired.push(entry);
        }
        retired
    }

    /// Returns the head entry, if any.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            Some(&self.entries[self.head])
        }
    }

    /// Finds the entry with the given id.
    pub fn find_entry(&self, msg_id: u64) -> Option<&RobEntry> {
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
    pub fn for_each(&self, mut f: impl FnMut(&RobEntry)) {
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].valid {
                f(&self.entries[idx]);
            }
            idx = (idx + 1) % self.entries.len();
        }
    }

    fn find_entry_mut(&mut self, msg_id: u64) -> Option<&mut RobEntry> {
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
