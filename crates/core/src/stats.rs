//! Simulation statistics collection and reporting.
//!
//! This module tracks per-core metrics for the simulator. It provides:
//! 1. **Throughput:** Cycles, dispatched requests, retired instructions.
//! 2. **Dispatch mix:** Counts by kind (compute, load, store).
//! 3. **Memory behavior:** Cache responses, forwarding hits, unknown ids.
//! 4. **Driver events:** Co-allocation rollbacks and skipped trace lines.

/// Per-core statistics structure.
#[derive(Clone, Debug, Default)]
pub struct CoreStats {
    /// Cycles this core has stepped.
    pub cycles: u64,
    /// Instructions dispatched into the ROB.
    pub requests: u64,
    /// Cache responses observed by the driver.
    pub responses: u64,
    /// Compute instructions dispatched.
    pub computes: u64,
    /// Loads dispatched.
    pub loads: u64,
    /// Stores dispatched.
    pub stores: u64,
    /// Instructions retired from the ROB.
    pub retired: u64,
    /// Loads satisfied by store-to-load forwarding.
    pub forward_hits: u64,
    /// ROB rollbacks after a failed LSQ co-allocation.
    pub rollbacks: u64,
    /// Blank or malformed trace lines skipped.
    pub skipped_lines: u64,
    /// Cache responses that matched no LSQ entry.
    pub unknown_responses: u64,
    /// Cycle of the last observed cache response.
    pub last_resp_cycle: u64,
    /// Cycle the core reached its termination condition.
    pub finish_cycle: u64,
}

impl CoreStats {
    /// Prints the end-of-run report for one core.
    pub fn print(&self, core_id: u16, period_ns: u64) {
        let ipc = if self.cycles > 0 {
            self.retired as f64 / self.cycles as f64
        } else {
            0.0
        };

        println!("----------------------------------------------------------");
        println!("CORE {}", core_id);
        println!("----------------------------------------------------------");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_time                 {} ns", self.cycles * period_ns);
        println!("finish_cycle             {}", self.finish_cycle);
        println!("insts_dispatched         {}", self.requests);
        println!("insts_retired            {}", self.retired);
        println!("sim_ipc                  {:.4}", ipc);
        println!(
            "dispatch_mix             compute={} load={} store={}",
            self.computes, self.loads, self.stores
        );
        println!("cache_responses          {}", self.responses);
        println!("forward_hits             {}", self.forward_hits);
        println!("rollbacks                {}", self.rollbacks);
        if self.skipped_lines > 0 {
            println!("skipped_trace_lines      {}", self.skipped_lines);
        }
        if self.unknown_responses > 0 {
            println!("unknown_responses        {}", self.unknown_responses);
        }
    }
}
