use std::collections::HashMap;
use std::io::Write;

use tempfile::NamedTempFile;
use tracesim_core::common::CachePort;
use tracesim_core::config::Config;
use tracesim_core::sim::SimOutcome;
use tracesim_core::{Core, Simulator};

/// Writes trace content to a temp file the core can open.
pub fn write_trace(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp trace");
    file.write_all(content.as_bytes()).expect("write trace");
    file.flush().expect("flush trace");
    file
}

/// Full-system harness: one core per trace wired to the memory model.
pub struct TestContext {
    pub sim: Simulator,
    _traces: Vec<NamedTempFile>,
}

impl TestContext {
    /// Single core, default configuration.
    pub fn new(trace: &str) -> Self {
        Self::with_config(trace, Config::default())
    }

    /// Single core with an adjusted configuration.
    pub fn with_config(trace: &str, mut config: Config) -> Self {
        let file = write_trace(trace);
        config.general.trace_paths = vec![file.path().to_str().unwrap().to_string()];
        let sim = Simulator::new(&config).expect("simulator");
        Self {
            sim,
            _traces: vec![file],
        }
    }

    /// One core per trace, shared configuration.
    pub fn multi(traces: &[&str], mut config: Config) -> Self {
        let files: Vec<NamedTempFile> = traces.iter().map(|t| write_trace(t)).collect();
        config.general.trace_paths = files
            .iter()
            .map(|f| f.path().to_str().unwrap().to_string())
            .collect();
        let sim = Simulator::new(&config).expect("simulator");
        Self {
            sim,
            _traces: files,
        }
    }

    pub fn core(&self) -> &Core {
        &self.sim.cores[0]
    }

    pub fn run(&mut self) -> SimOutcome {
        self.sim.run()
    }
}

/// Bare-core harness for cycle-precise driver tests with a hand-driven
/// cache port (no memory model behind it).
pub struct CoreHarness {
    pub core: Core,
    pub port: CachePort,
    _trace: NamedTempFile,
}

impl CoreHarness {
    pub fn new(trace: &str, config: Config) -> Self {
        let file = write_trace(trace);
        let core = Core::new(0, file.path().to_str().unwrap(), &config).expect("core");
        Self {
            core,
            port: CachePort::new(config.memory.fifo_depth),
            _trace: file,
        }
    }

    pub fn step(&mut self) {
        self.core.step(&mut self.port);
    }
}

/// Structural invariants that must hold after every cycle.
///
/// Covers queue bounds, dispatch-order id monotonicity, the ROB/LSQ
/// correspondence, and the in-flight counter bounds of the chosen
/// accounting (driver observes consumed responses; a forwarded load takes
/// no slot).
pub fn check_invariants(core: &Core) {
    assert!(core.rob.len() <= core.rob.capacity());
    assert!(core.lsq.len() <= core.lsq.capacity());

    let mut rob_ids = Vec::new();
    core.rob.for_each(|e| rob_ids.push(e.request.msg_id));
    assert!(
        rob_ids.windows(2).all(|w| w[0] < w[1]),
        "rob ids out of dispatch order: {:?}",
        rob_ids
    );

    let mut lsq_ids = Vec::new();
    core.lsq.for_each(|e| lsq_ids.push(e.request.msg_id));
    assert!(
        lsq_ids.windows(2).all(|w| w[0] < w[1]),
        "lsq ids out of dispatch order: {:?}",
        lsq_ids
    );

    core.lsq.for_each(|entry| {
        match core.rob.find_entry(entry.request.msg_id) {
            Some(rob_entry) => {
                if entry.request.is_load() && entry.ready {
                    assert!(
                        rob_entry.ready,
                        "ready lsq load {} has unready rob entry",
                        entry.request.msg_id
                    );
                }
            }
            None => {
                // Only a store awaiting its ack may outlive its ROB entry.
                assert!(
                    entry.request.is_store(),
                    "lsq load {} has no rob entry",
                    entry.request.msg_id
                );
                assert!(
                    !entry.cache_ack,
                    "acked store {} still in lsq without rob entry",
                    entry.request.msg_id
                );
            }
        }
    });

    let waiting = core.lsq.waiting_count() as u32;
    assert!(
        core.in_flight() >= waiting,
        "in_flight {} below waiting entries {}",
        core.in_flight(),
        waiting
    );
}

/// Tracks ready flags across cycles to prove they are monotonic.
#[derive(Default)]
pub struct ReadyMonotonicity {
    rob_ready: HashMap<u64, bool>,
    lsq_ready: HashMap<u64, bool>,
}

impl ReadyMonotonicity {
    pub fn observe(&mut self, core: &Core) {
        let mut present = Vec::new();
        core.rob.for_each(|e| {
            let id = e.request.msg_id;
            present.push(id);
            let was = self.rob_ready.insert(id, e.ready).unwrap_or(false);
            assert!(!(was && !e.ready), "rob ready flag regressed for {}", id);
        });
        self.rob_ready.retain(|id, _| present.contains(id));

        let mut present = Vec::new();
        core.lsq.for_each(|e| {
            let id = e.request.msg_id;
            present.push(id);
            let was = self.lsq_ready.insert(id, e.ready).unwrap_or(false);
            assert!(!(was && !e.ready), "lsq ready flag regressed for {}", id);
        });
        self.lsq_ready.retain(|id, _| present.contains(id));
    }
}
