//! Cost-model execution: spread, slippage and size impact.
//!
//! Per-share adjustment terms, all derived from the order's reference
//! price (fractions are micros-scaled, 1_000_000 = 1.0):
//!
//! ```text
//! spread_half = ref * spread_fraction / 2
//! base_slip   = ref * base_slippage_fraction
//! size_impact = ref * impact_per_share * qty
//! random_slip ~ uniform(ref * [-volatility, +volatility])
//! ```
//!
//! BUY fills at `ref + spread_half + base_slip + size_impact +
//! random_slip`; SELL subtracts the same terms (floored at zero).
//! Random slippage comes from a `ChaCha8Rng` seeded at construction so
//! runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tape_events::{Fill, Order, Side, MICROS_SCALE};

use crate::model::ExecutionModel;

fn i128_to_i64_clamp(x: i128) -> i64 {
    if x > i64::MAX as i128 {
        i64::MAX
    } else if x < i64::MIN as i128 {
        i64::MIN
    } else {
        x as i64
    }
}

/// Fraction of a price (micros-scaled fraction).
fn price_fraction(price_micros: i64, fraction_micros: i64) -> i64 {
    i128_to_i64_clamp(price_micros as i128 * fraction_micros as i128 / MICROS_SCALE as i128)
}

/// Cost-model knobs. All fractions micros-scaled; all must be >= 0
/// (negative values would produce systematically favorable fills).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CostModelConfig {
    /// Full bid/ask spread as a fraction of the reference price; each
    /// fill pays half.
    pub spread_fraction_micros: i64,
    /// Flat slippage floor as a fraction of the reference price.
    pub base_slippage_fraction_micros: i64,
    /// Additional price impact per share, as a fraction of the
    /// reference price; scales linearly with order quantity.
    pub impact_per_share_micros: i64,
    /// Half-width of the uniform random slippage band, as a fraction
    /// of the reference price. 0 = no randomness drawn.
    pub slippage_volatility_micros: i64,
}

impl CostModelConfig {
    /// All costs off: behaves like the base variant.
    pub fn zero() -> Self {
        Self {
            spread_fraction_micros: 0,
            base_slippage_fraction_micros: 0,
            impact_per_share_micros: 0,
            slippage_volatility_micros: 0,
        }
    }
}

/// Running totals across all fills, in micros of cash.
///
/// Observational only: reported after the run, never read by
/// admission control or the scheduler.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CostTotals {
    pub spread_cost_micros: i64,
    pub slippage_cost_micros: i64,
}

/// Cost-model variant with a seeded PRNG.
pub struct CostModelExecution {
    config: CostModelConfig,
    rng: ChaCha8Rng,
    totals: CostTotals,
}

impl CostModelExecution {
    pub fn new(config: CostModelConfig, seed: u64) -> Self {
        debug_assert!(config.spread_fraction_micros >= 0);
        debug_assert!(config.base_slippage_fraction_micros >= 0);
        debug_assert!(config.impact_per_share_micros >= 0);
        debug_assert!(config.slippage_volatility_micros >= 0);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            totals: CostTotals::default(),
        }
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }

    pub fn totals(&self) -> &CostTotals {
        &self.totals
    }
}

impl ExecutionModel for CostModelExecution {
    fn fill(&mut self, order: &Order) -> Fill {
        let reference = order.reference_price_micros;

        let spread_half = price_fraction(reference, self.config.spread_fraction_micros) / 2;
        let base_slip = price_fraction(reference, self.config.base_slippage_fraction_micros);
        let size_impact = i128_to_i64_clamp(
            reference as i128 * self.config.impact_per_share_micros as i128 * order.qty as i128
                / MICROS_SCALE as i128,
        );

        let band = price_fraction(reference, self.config.slippage_volatility_micros);
        let random_slip = if band > 0 {
            self.rng.gen_range(-band..=band)
        } else {
            0
        };

        let adjustment = spread_half
            .saturating_add(base_slip)
            .saturating_add(size_impact)
            .saturating_add(random_slip);

        let fill_price = match order.side {
            Side::Buy => reference.saturating_add(adjustment),
            Side::Sell => reference.saturating_sub(adjustment).max(0),
        };

        self.totals.spread_cost_micros = self
            .totals
            .spread_cost_micros
            .saturating_add(i128_to_i64_clamp(spread_half as i128 * order.qty as i128));
        let slip_per_share = base_slip
            .saturating_add(size_impact)
            .saturating_add(random_slip.abs());
        self.totals.slippage_cost_micros = self
            .totals
            .slippage_cost_micros
            .saturating_add(i128_to_i64_clamp(slip_per_share as i128 * order.qty as i128));

        Fill::new(
            order.logical_time,
            order.symbol.clone(),
            order.side,
            order.qty,
            fill_price,
        )
    }
}
