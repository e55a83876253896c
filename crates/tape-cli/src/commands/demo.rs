//! `tape demo`: the built-in tape through the demo mean-reversion
//! strategy — a no-setup smoke run of the whole pipeline.

use anyhow::{Context, Result};

use tape_config::to_micros;
use tape_engine::Simulation;
use tape_events::MICROS_SCALE;
use tape_exec::Execution;
use tape_risk::RiskConfig;
use tape_strategy::RollingMeanReversion;

pub fn execute(cash: f64) -> Result<()> {
    let initial_cash_micros = to_micros(cash).context("--cash")?;
    if initial_cash_micros <= 0 {
        anyhow::bail!("--cash must be positive");
    }

    let mut sim = Simulation::new(
        initial_cash_micros,
        RiskConfig::sane_defaults(),
        Execution::immediate(),
    );
    // window 5, threshold 2.00: trades a handful of times on the
    // built-in oscillating tape
    sim.add_strategy(Box::new(RollingMeanReversion::new(
        5,
        2 * MICROS_SCALE,
        None,
    )));
    sim.seed_observations(tape_data::demo_tape());

    let report = sim.run().context("demo simulation failed")?;
    super::print_report(&report);
    Ok(())
}
