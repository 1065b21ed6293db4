//! Trace-driven out-of-order core simulator CLI.
//!
//! This binary wires trace files to simulated cores and runs the cycle loop
//! to completion. It performs:
//! 1. **Configuration:** Builds a `Config` from an optional JSON file with
//!    command-line flags layered on top.
//! 2. **Simulation:** Constructs the cores, cache ports, and memory model,
//!    then ticks until every core terminates or the cycle budget runs out.
//! 3. **Reporting:** Prints per-core statistics and exits 0 on completion,
//!    1 on a fatal startup error, 2 when the cycle budget is exhausted.

use clap::Parser;
use std::process;

use tracesim_core::Simulator;
use tracesim_core::config::Config;
use tracesim_core::sim::SimOutcome;

/// Command-line arguments for the trace simulator.
#[derive(Parser, Debug)]
#[command(
    name = "tracesim",
    author,
    version,
    about = "Trace-driven out-of-order core simulator",
    long_about = "Replays benchmark traces through an out-of-order core model \
(reorder buffer + load-store queue) against a fixed-latency memory.\n\n\
Trace format: one group per line, `<compute_count> <addr> <R|W>`. Addresses \
are hexadecimal when 0x-prefixed, decimal otherwise (the historical format \
wrote bare hex; prefix it)."
)]
struct Args {
    /// Benchmark trace file; repeat the flag to run one core per trace.
    #[arg(short, long, required_unless_present = "config")]
    trace: Vec<String>,

    /// Run N cores sharing a single --trace file.
    #[arg(long)]
    cores: Option<u16>,

    /// Maximum in-flight memory requests per core.
    #[arg(long, value_name = "N")]
    ooo_stages: Option<u32>,

    /// Clock period in nanoseconds.
    #[arg(long, value_name = "NS")]
    clock: Option<u64>,

    /// Clock skew as a percentage of the period.
    #[arg(long, value_name = "PERCENT")]
    skew: Option<u32>,

    /// Enable per-cycle trace output on stderr.
    #[arg(long)]
    log: bool,

    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<String>,

    /// Cycle budget before giving up.
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Memory model response latency in cycles.
    #[arg(long, value_name = "N")]
    mem_latency: Option<u64>,
}

fn main() {
    let args = Args::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => Config::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: {}", e);
            process::exit(1);
        }),
        None => Config::default(),
    };

    if !args.trace.is_empty() {
        config.general.trace_paths = args.trace.clone();
    }
    if let Some(cores) = args.cores {
        let paths = config.general.trace_paths.clone();
        if paths.len() != 1 {
            eprintln!("[!] FATAL: --cores needs exactly one --trace to replicate");
            process::exit(1);
        }
        config.general.trace_paths = vec![paths[0].clone(); cores as usize];
    }
    if let Some(n) = args.ooo_stages {
        config.core.max_ooo_requests = n;
    }
    if let Some(ns) = args.clock {
        config.clock.period_ns = ns;
    }
    if let Some(percent) = args.skew {
        config.clock.skew_percent = percent;
    }
    if args.log {
        config.general.log_enabled = true;
    }
    if let Some(n) = args.max_cycles {
        config.general.max_cycles = n;
    }
    if let Some(n) = args.mem_latency {
        config.memory.latency = n;
    }

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: {}", e);
        process::exit(1);
    });

    println!(
        "[*] {} core(s), ooo_stages={}, mem_latency={}",
        sim.cores.len(),
        config.core.max_ooo_requests,
        config.memory.latency
    );

    let outcome = sim.run();
    sim.print_report();

    match outcome {
        SimOutcome::Completed { cycles } => {
            println!("\n[*] Simulation complete at cycle {}", cycles);
        }
        SimOutcome::CycleLimit { cycles } => {
            eprintln!(
                "\n[!] Cycle budget exhausted at cycle {} without termination",
                cycles
            );
            process::exit(2);
        }
    }
}
