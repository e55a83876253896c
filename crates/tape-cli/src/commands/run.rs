//! `tape run`: load config + tape, build the simulation, drain, report.

use anyhow::{bail, Context, Result};

use tape_config::{to_micros, ExecutionConfig, RunConfig, StrategyConfig};
use tape_engine::Simulation;
use tape_events::Side;
use tape_exec::{CostModelConfig, CostModelExecution, Execution};
use tape_risk::RiskConfig;
use tape_strategy::{
    MomentumCrossover, OneShotStrategy, RollingMeanReversion, ScriptedStrategy, Strategy,
};

pub fn execute(config_path: &str, data_path: &str) -> Result<()> {
    let config = tape_config::load_file(config_path)?;
    let tape = tape_data::load_csv_file(data_path)
        .with_context(|| format!("load observation tape {}", data_path))?;
    if tape.is_empty() {
        bail!("observation tape {} contains no rows", data_path);
    }
    tracing::info!(observations = tape.len(), "tape loaded");

    let mut sim = Simulation::new(
        config.initial_cash_micros()?,
        build_risk(&config)?,
        build_execution(&config)?,
    );
    sim.add_strategy(build_strategy(&config)?);
    sim.seed_observations(tape);

    let report = sim.run().context("simulation failed")?;
    super::print_report(&report);
    Ok(())
}

fn build_risk(config: &RunConfig) -> Result<RiskConfig> {
    Ok(RiskConfig {
        fixed_qty: config.fixed_order_qty,
        max_drawdown_micros: to_micros(config.max_drawdown).context("max_drawdown")?,
        max_order_value_micros: to_micros(config.max_order_value).context("max_order_value")?,
        max_position_fraction_micros: to_micros(config.max_position_fraction)
            .context("max_position_fraction")?,
        max_total_exposure_fraction_micros: to_micros(config.max_total_exposure_fraction)
            .context("max_total_exposure_fraction")?,
        max_open_positions: config.max_open_positions,
    })
}

fn build_execution(config: &RunConfig) -> Result<Execution> {
    Ok(match &config.execution {
        ExecutionConfig::Immediate => Execution::immediate(),
        ExecutionConfig::Cost {
            spread_fraction,
            base_slippage_fraction,
            impact_per_share,
            slippage_volatility,
            seed,
        } => Execution::Cost(CostModelExecution::new(
            CostModelConfig {
                spread_fraction_micros: to_micros(*spread_fraction).context("spread_fraction")?,
                base_slippage_fraction_micros: to_micros(*base_slippage_fraction)
                    .context("base_slippage_fraction")?,
                impact_per_share_micros: to_micros(*impact_per_share)
                    .context("impact_per_share")?,
                slippage_volatility_micros: to_micros(*slippage_volatility)
                    .context("slippage_volatility")?,
            },
            *seed,
        )),
    })
}

fn build_strategy(config: &RunConfig) -> Result<Box<dyn Strategy>> {
    Ok(match &config.strategy {
        StrategyConfig::MeanReversion {
            window,
            threshold,
            symbol,
        } => Box::new(RollingMeanReversion::new(
            *window,
            to_micros(*threshold).context("threshold")?,
            symbol.clone(),
        )),
        StrategyConfig::Momentum {
            fast,
            slow,
            signal,
            symbol,
        } => Box::new(MomentumCrossover::new(*fast, *slow, *signal, symbol.clone())),
        StrategyConfig::Scripted { symbol, legs } => {
            let legs = legs
                .iter()
                .map(|leg| {
                    let side = match leg.side.as_str() {
                        "BUY" => Side::Buy,
                        "SELL" => Side::Sell,
                        other => bail!("unknown side {:?}", other),
                    };
                    Ok((leg.logical_time, side))
                })
                .collect::<Result<Vec<_>>>()?;
            Box::new(ScriptedStrategy::new(symbol.clone(), legs))
        }
        StrategyConfig::OneShot { symbol } => Box::new(OneShotStrategy::new(symbol.clone())),
    })
}
