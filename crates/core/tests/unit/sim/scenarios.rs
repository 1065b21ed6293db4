//! End-to-End Scenarios.
//!
//! Literal-input scenarios run against the fixed-latency memory model:
//! pure compute, store-to-load forwarding, head-only issuance, out-of-order
//! response arrival, termination quiescence, and multi-core independence.

use crate::common::harness::{CoreHarness, TestContext};
use tracesim_core::common::RespMsg;
use tracesim_core::config::Config;
use tracesim_core::sim::SimOutcome;

fn resp(msg_id: u64, addr: u64) -> RespMsg {
    RespMsg {
        msg_id,
        addr,
        req_cycle: 0,
        resp_cycle: 0,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Pure compute burst followed by a load
// ══════════════════════════════════════════════════════════

#[test]
fn compute_burst_then_load() {
    let mut ctx = TestContext::new("3 0x0 R\n");

    // One compute per cycle at cycles 0..2, the load at cycle 3.
    for expected in 1..=3 {
        ctx.sim.tick();
        assert_eq!(ctx.core().stats().computes, expected);
    }
    ctx.sim.tick();
    assert_eq!(ctx.core().stats().loads, 1);

    let outcome = ctx.run();
    // Load emitted at cycle 4, answered at 14, drained at 15, retired and
    // terminated at 16 (default 10-cycle memory latency).
    assert_eq!(outcome, SimOutcome::Completed { cycles: 17 });

    let stats = ctx.core().stats();
    assert_eq!(stats.retired, 4);
    assert_eq!(stats.responses, 1);
    assert_eq!(stats.forward_hits, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Store-to-load forwarding
// ══════════════════════════════════════════════════════════

#[test]
fn store_to_load_forwarding() {
    let mut ctx = TestContext::new("0 0x100 W\n0 0x100 R\n");
    let outcome = ctx.run();

    let stats = ctx.core().stats();
    assert_eq!(stats.forward_hits, 1);
    // Only the store went to the cache; the load forwarded.
    assert_eq!(stats.responses, 1);
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.retired, 2);
    assert_eq!(outcome, SimOutcome::Completed { cycles: 13 });
}

// ══════════════════════════════════════════════════════════
// 3. Head-only cache issuance
// ══════════════════════════════════════════════════════════

#[test]
fn stores_drain_head_only() {
    let mut ctx = TestContext::new("0 0x100 W\n0 0x200 W\n");

    let mut cycles = 0;
    while !ctx.sim.all_done() {
        ctx.sim.tick();
        // The second store may only reach the cache after the first has
        // been acked and drained from the LSQ.
        let core = ctx.core();
        if core.lsq.find_entry(1).is_some_and(|e| e.waiting_for_cache) {
            assert!(core.lsq.find_entry(0).is_none());
        }
        assert!(ctx.sim.ports[0].tx.len() <= 1);
        cycles += 1;
        assert!(cycles < 1_000, "stores failed to drain");
    }

    let stats = ctx.core().stats();
    assert_eq!(stats.responses, 2);
    assert_eq!(stats.retired, 2);
}

// ══════════════════════════════════════════════════════════
// 4. Out-of-order response arrival
// ══════════════════════════════════════════════════════════

#[test]
fn responses_accepted_out_of_order_drain_in_order() {
    // Hand-driven port so the response order can be inverted.
    let mut h = CoreHarness::new("0 0x100 R\n0 0x200 R\n", Config::default());

    h.step(); // load 0 co-allocates
    h.step(); // load 0 issued; load 1 co-allocates behind it
    assert_eq!(h.port.tx.pop().unwrap().msg_id, 0);
    assert_eq!(h.core.lsq.len(), 2);

    // Younger load answered first.
    h.port.rx.push(resp(1, 0x200));
    h.port.rx.push(resp(0, 0x100));

    h.step();
    assert!(h.core.lsq.find_entry(1).unwrap().ready);
    assert_eq!(h.core.lsq.len(), 2); // head still unready, nothing drains

    h.step();
    assert!(h.core.lsq.is_empty()); // head readied, both drain in order

    h.step();
    assert!(h.core.rob.is_empty());
    assert!(h.core.is_done());
}

// ══════════════════════════════════════════════════════════
// 5. Termination quiescence
// ══════════════════════════════════════════════════════════

#[test]
fn terminated_system_is_quiescent() {
    let trace = "\
1 0x100 R
0 0x100 W
2 0x100 R
0 0x200 W
0 0x200 R
";
    let mut ctx = TestContext::new(trace);
    let outcome = ctx.run();
    assert!(matches!(outcome, SimOutcome::Completed { .. }));

    let stats = ctx.core().stats();
    assert!(ctx.core().is_done());
    assert!(ctx.core().rob.is_empty());
    assert!(ctx.core().lsq.is_empty());
    assert_eq!(ctx.core().in_flight(), 0);
    assert!(ctx.sim.memory.is_idle());
    assert_eq!(stats.requests, stats.retired);

    // No observable state changes once terminated.
    let cycle = ctx.core().cycle();
    for _ in 0..5 {
        ctx.sim.tick();
    }
    assert_eq!(ctx.core().cycle(), cycle);
    assert_eq!(ctx.core().stats().retired, stats.retired);
}

#[test]
fn cycle_budget_reports_limit() {
    let mut config = Config::default();
    config.general.max_cycles = 5;
    // Latency far beyond the budget: the load cannot complete in time.
    config.memory.latency = 1_000;
    let mut ctx = TestContext::with_config("0 0x100 R\n", config);

    let outcome = ctx.run();
    assert_eq!(outcome, SimOutcome::CycleLimit { cycles: 5 });
    assert!(!ctx.core().is_done());
}

// ══════════════════════════════════════════════════════════
// 6. Multi-core independence
// ══════════════════════════════════════════════════════════

#[test]
fn cores_complete_independently() {
    let mut ctx = TestContext::multi(
        &["1 0x10 R\n", "0 0x20 W\n2 0x30 R\n"],
        Config::default(),
    );
    let outcome = ctx.run();
    assert!(matches!(outcome, SimOutcome::Completed { .. }));

    let s0 = ctx.sim.cores[0].stats();
    let s1 = ctx.sim.cores[1].stats();
    assert_eq!(s0.requests, 2); // 1 compute + 1 load
    assert_eq!(s1.requests, 4); // 1 store + 2 computes + 1 load
    assert_eq!(s0.requests, s0.retired);
    assert_eq!(s1.requests, s1.retired);
    assert!(ctx.sim.cores.iter().all(|c| c.is_done()));
}
