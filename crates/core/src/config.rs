//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline structural constants (ROB, LSQ, FIFO depths, IPC).
//! 2. **Structures:** Hierarchical config for general, core, clock, and memory
//!    settings.
//! 3. **Loading:** JSON deserialization and startup validation.
//!
//! Configuration is supplied as JSON (`Config::from_json_file`) or built from
//! CLI flags on top of `Config::default()`.

use serde::Deserialize;

use crate::common::SimError;

/// Default configuration constants.
///
/// These values define the baseline core configuration when not explicitly
/// overridden.
mod defaults {
    /// Reorder buffer capacity in entries.
    pub const ROB_ENTRIES: usize = 32;

    /// Maximum instructions retired from the ROB per cycle.
    pub const IPC: u32 = 4;

    /// Load-store queue capacity in entries.
    pub const LSQ_ENTRIES: usize = 8;

    /// Maximum memory requests in flight per core.
    pub const MAX_OOO_REQUESTS: u32 = 16;

    /// Depth of each cache TX/RX FIFO.
    pub const FIFO_DEPTH: usize = 16;

    /// Cycles between a request leaving TX and its response entering RX.
    pub const MEM_LATENCY: u64 = 10;

    /// Core clock period in nanoseconds.
    pub const CLOCK_PERIOD_NS: u64 = 1;

    /// Cycle budget before the harness gives up on termination.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use tracesim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.core.rob_entries, 32);
/// assert_eq!(config.core.lsq_entries, 8);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use tracesim_core::config::Config;
///
/// let json = r#"{
///     "general": {
///         "trace_paths": ["bench.trc"],
///         "log_enabled": true
///     },
///     "core": {
///         "rob_entries": 16,
///         "ipc": 2,
///         "lsq_entries": 4
///     },
///     "memory": {
///         "latency": 25
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.core.rob_entries, 16);
/// assert_eq!(config.core.ipc, 2);
/// assert_eq!(config.core.max_ooo_requests, 16);
/// assert_eq!(config.memory.latency, 25);
/// assert_eq!(config.clock.period_ns, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-core structural parameters.
    #[serde(default)]
    pub core: CoreConfig,
    /// Clock period and skew.
    #[serde(default)]
    pub clock: ClockConfig,
    /// External memory model parameters.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &str) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::ConfigLoad(format!("{}: {}", path, e)))?;
        serde_json::from_str(&text).map_err(|e| SimError::ConfigLoad(format!("{}: {}", path, e)))
    }

    /// Checks structural parameters for consistency.
    ///
    /// A zero-capacity queue or a zero retire rate would deadlock the cycle
    /// loop, so these are rejected at startup.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.core.rob_entries == 0 {
            return Err(SimError::InvalidConfig("rob_entries must be > 0".into()));
        }
        if self.core.lsq_entries == 0 {
            return Err(SimError::InvalidConfig("lsq_entries must be > 0".into()));
        }
        if self.core.ipc == 0 {
            return Err(SimError::InvalidConfig("ipc must be > 0".into()));
        }
        if self.core.max_ooo_requests == 0 {
            return Err(SimError::InvalidConfig(
                "max_ooo_requests must be > 0".into(),
            ));
        }
        if self.memory.fifo_depth == 0 {
            return Err(SimError::InvalidConfig("fifo_depth must be > 0".into()));
        }
        if self.clock.period_ns == 0 {
            return Err(SimError::InvalidConfig("period_ns must be > 0".into()));
        }
        if self.clock.skew_percent >= 100 {
            return Err(SimError::InvalidConfig(
                "skew_percent must be < 100".into(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Benchmark trace file per core; one core is spawned per entry.
    #[serde(default)]
    pub trace_paths: Vec<String>,

    /// Enable per-cycle trace output and warnings to stderr.
    #[serde(default)]
    pub log_enabled: bool,

    /// Cycle budget for the harness.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_paths: Vec::new(),
            log_enabled: false,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Per-core structural parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Reorder buffer capacity.
    #[serde(default = "CoreConfig::default_rob_entries")]
    pub rob_entries: usize,

    /// Maximum retirements per cycle.
    #[serde(default = "CoreConfig::default_ipc")]
    pub ipc: u32,

    /// Load-store queue capacity.
    #[serde(default = "CoreConfig::default_lsq_entries")]
    pub lsq_entries: usize,

    /// Maximum in-flight memory requests (the OoO window toward the cache).
    #[serde(default = "CoreConfig::default_max_ooo_requests")]
    pub max_ooo_requests: u32,

    /// When set, a COMPUTE instruction holds one in-flight slot from
    /// dispatch until it retires from the ROB. Off by default: compute
    /// instructions consume no cache bandwidth.
    #[serde(default)]
    pub count_compute_in_flight: bool,
}

impl CoreConfig {
    fn default_rob_entries() -> usize {
        defaults::ROB_ENTRIES
    }

    fn default_ipc() -> u32 {
        defaults::IPC
    }

    fn default_lsq_entries() -> usize {
        defaults::LSQ_ENTRIES
    }

    fn default_max_ooo_requests() -> u32 {
        defaults::MAX_OOO_REQUESTS
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rob_entries: defaults::ROB_ENTRIES,
            ipc: defaults::IPC,
            lsq_entries: defaults::LSQ_ENTRIES,
            max_ooo_requests: defaults::MAX_OOO_REQUESTS,
            count_compute_in_flight: false,
        }
    }
}

/// Clock period and skew.
///
/// The harness advances in unit cycles; the period scales reported simulated
/// time and the skew orders core stepping within a global cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Clock period in nanoseconds.
    #[serde(default = "ClockConfig::default_period_ns")]
    pub period_ns: u64,

    /// Clock skew as a percentage of the period, in [0, 100).
    #[serde(default)]
    pub skew_percent: u32,
}

impl ClockConfig {
    fn default_period_ns() -> u64 {
        defaults::CLOCK_PERIOD_NS
    }

    /// Skew offset in nanoseconds.
    pub fn skew_ns(&self) -> u64 {
        self.period_ns * self.skew_percent as u64 / 100
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_ns: defaults::CLOCK_PERIOD_NS,
            skew_percent: 0,
        }
    }
}

/// External memory model parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Fixed response latency in cycles.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// Depth of each cache TX/RX FIFO.
    #[serde(default = "MemoryConfig::default_fifo_depth")]
    pub fifo_depth: usize,
}

impl MemoryConfig {
    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }

    fn default_fifo_depth() -> usize {
        defaults::FIFO_DEPTH
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: defaults::MEM_LATENCY,
            fifo_depth: defaults::FIFO_DEPTH,
        }
    }
}
