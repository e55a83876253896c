//! Full pipeline over a scripted tape: observation -> intent -> order
//! -> fill -> ledger, with exact accounting at every step.

use tape_data::single_symbol;
use tape_engine::Simulation;
use tape_events::{Side, MICROS_SCALE};
use tape_exec::Execution;
use tape_risk::RiskConfig;
use tape_strategy::ScriptedStrategy;

const M: i64 = MICROS_SCALE;

#[test]
fn scripted_round_trip_accounts_exactly() {
    let tape = single_symbol(
        "AAPL",
        &[100 * M, 101 * M, 102 * M, 99 * M, 95 * M],
    );

    let mut sim = Simulation::new(10_000 * M, RiskConfig::sane_defaults(), Execution::immediate());
    sim.add_strategy(Box::new(ScriptedStrategy::new(
        "AAPL",
        vec![(1, Side::Buy), (3, Side::Sell)],
    )));
    sim.seed_observations(tape);

    let report = sim.run().expect("run");

    // Two fills: Buy 10 @ 101 at t=1, Sell 10 @ 99 at t=3.
    assert_eq!(report.fills.len(), 2);
    assert_eq!(report.fills[0].side, Side::Buy);
    assert_eq!(report.fills[0].qty, 10);
    assert_eq!(report.fills[0].fill_price_micros, 101 * M);
    assert_eq!(report.fills[0].logical_time, 1);
    assert_eq!(report.fills[1].side, Side::Sell);
    assert_eq!(report.fills[1].fill_price_micros, 99 * M);
    assert_eq!(report.fills[1].logical_time, 3);

    // Final accounting: bought at 101, sold at 99.
    assert_eq!(report.final_cash_micros, 9_980 * M);
    assert_eq!(report.realized_pnl_micros, -20 * M);
    assert!(report.positions.is_empty());
    assert_eq!(report.final_equity_micros, 9_980 * M);
    assert_eq!(report.total_return_micros(), -20 * M);

    // Equity curve: one sample per tick; the fill's sample wins its tick.
    assert_eq!(
        report.equity_curve,
        vec![
            (0, 10_000 * M),
            (1, 10_000 * M), // cash 8_990 + 10 * 101
            (2, 10_010 * M), // marked at 102
            (3, 9_980 * M),
            (4, 9_980 * M),
        ]
    );

    // 5 observations + 2 intents + 2 orders + 2 fills.
    assert_eq!(report.stats.events_dispatched, 11);
    assert_eq!(report.stats.events_emitted, 6);
    assert!(report.rejections.is_empty());
}

#[test]
fn a_simulation_is_not_resumable() {
    let mut sim = Simulation::new(10_000 * M, RiskConfig::sane_defaults(), Execution::immediate());
    sim.seed_observations(single_symbol("AAPL", &[100 * M]));
    sim.run().expect("first run");

    let err = sim.run().expect_err("second run must fail");
    assert!(err.to_string().contains("already drained"), "got: {err}");
}

#[test]
fn multiple_strategies_fan_out_on_the_same_tape() {
    // Two scripted strategies on one symbol: both trade independently.
    let tape = single_symbol("AAPL", &[100 * M, 101 * M, 102 * M]);

    let mut sim = Simulation::new(100_000 * M, RiskConfig::sane_defaults(), Execution::immediate());
    sim.add_strategy(Box::new(ScriptedStrategy::new("AAPL", vec![(0, Side::Buy)])));
    sim.add_strategy(Box::new(ScriptedStrategy::new("AAPL", vec![(0, Side::Buy)])));
    sim.seed_observations(tape);

    let report = sim.run().expect("run");
    assert_eq!(report.fills.len(), 2);
    // Both buys landed at t=0: position is 20 @ 100.
    let pos = report.positions.get("AAPL").expect("open position");
    assert_eq!(pos.qty_signed, 20);
    assert_eq!(pos.avg_cost_micros, 100 * M);
}
