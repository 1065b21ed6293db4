//! Simulator: owns the cores, their cache ports, and the memory model.
//!
//! The harness advances a global clock in unit cycles. Each tick steps every
//! core against its own port, then steps the memory model over all ports.
//! Cores are independent; the only coupling is the shared clock.

use crate::common::error::SimError;
use crate::common::fifo::CachePort;
use crate::config::{ClockConfig, Config};
use crate::core::Core;
use crate::sim::memory::MemoryModel;

/// How a simulation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimOutcome {
    /// Every core reached its termination condition.
    Completed {
        /// Global cycles elapsed.
        cycles: u64,
    },
    /// The cycle budget ran out first.
    CycleLimit {
        /// Global cycles elapsed.
        cycles: u64,
    },
}

/// Top-level simulator: cores, ports, memory model, and the global clock.
pub struct Simulator {
    /// Simulated cores, one per trace file.
    pub cores: Vec<Core>,
    /// Cache interface of each core, indexed like `cores`.
    pub ports: Vec<CachePort>,
    /// External memory stand-in.
    pub memory: MemoryModel,
    clock: ClockConfig,
    cycle: u64,
    max_cycles: u64,
}

impl Simulator {
    /// Builds a simulator from a validated configuration, opening one core
    /// per trace file.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        if config.general.trace_paths.is_empty() {
            return Err(SimError::InvalidConfig("no trace files given".into()));
        }

        let mut cores = Vec::with_capacity(config.general.trace_paths.len());
        for (id, path) in config.general.trace_paths.iter().enumerate() {
            cores.push(Core::new(id as u16, path, config)?);
        }
        let ports = cores
            .iter()
            .map(|_| CachePort::new(config.memory.fifo_depth))
            .collect::<Vec<_>>();
        let memory = MemoryModel::new(config.memory.latency, cores.len());

        Ok(Self {
            cores,
            ports,
            memory,
            clock: config.clock.clone(),
            cycle: 0,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Current global cycle.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// True once every core is done.
    pub fn all_done(&self) -> bool {
        self.cores.iter().all(Core::is_done)
    }

    /// Advances the whole system by one global cycle.
    pub fn tick(&mut self) {
        for (core, port) in self.cores.iter_mut().zip(self.ports.iter_mut()) {
            core.step(port);
        }
        self.memory.step(self.cycle, &mut self.ports);
        self.cycle += 1;
    }

    /// Runs until every core terminates or the cycle budget is exhausted.
    pub fn run(&mut self) -> SimOutcome {
        while !self.all_done() {
            if self.cycle >= self.max_cycles {
                return SimOutcome::CycleLimit {
                    cycles: self.cycle,
                };
            }
            self.tick();
        }
        SimOutcome::Completed {
            cycles: self.cycle,
        }
    }

    /// Prints the per-core statistics report.
    pub fn print_report(&self) {
        println!("==========================================================");
        println!("TRACE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("global_cycles            {}", self.cycle);
        println!(
            "clock                    {} ns/cycle (skew {} ns)",
            self.clock.period_ns,
            self.clock.skew_ns()
        );
        for core in &self.cores {
            core.stats().print(core.core_id(), self.clock.period_ns);
        }
    }
}
