//! The ledger's cash invariant is fatal when admission sizing and
//! execution costs disagree: an order that passes the cash gate at the
//! reference price but fills above it (slippage) breaks the run with a
//! diagnostic naming the tick and symbol — never a silent clamp or a
//! partial fill.

use tape_data::single_symbol;
use tape_engine::Simulation;
use tape_events::{Side, MICROS_SCALE};
use tape_exec::{CostModelConfig, CostModelExecution, Execution};
use tape_risk::RiskConfig;
use tape_strategy::ScriptedStrategy;

const M: i64 = MICROS_SCALE;

#[test]
fn slippage_past_available_cash_terminates_the_run() {
    // Cash exactly covers 10 @ 100 at the reference price; a 2% spread
    // fills at 101, costing 1_010 with only 1_000 available.
    let tape = single_symbol("AAPL", &[100 * M, 100 * M]);

    let costs = CostModelConfig {
        spread_fraction_micros: 20_000, // 2% full spread, 1% half
        ..CostModelConfig::zero()
    };

    let mut sim = Simulation::new(
        1_000 * M,
        RiskConfig::sane_defaults(),
        Execution::Cost(CostModelExecution::new(costs, 1)),
    );
    sim.add_strategy(Box::new(ScriptedStrategy::new("AAPL", vec![(0, Side::Buy)])));
    sim.seed_observations(tape);

    let err = sim.run().expect_err("cash invariant must be fatal");
    let msg = err.to_string();
    assert!(msg.contains("insufficient cash"), "got: {msg}");
    assert!(msg.contains("AAPL"), "got: {msg}");
    assert!(msg.contains("logical_time 0"), "got: {msg}");

    // The ledger was not partially mutated by the failing fill.
    let ledger = sim.ledger();
    assert_eq!(ledger.cash_micros(), 1_000 * M);
    assert!(ledger.is_flat());
    assert!(ledger.fills().is_empty());
}
