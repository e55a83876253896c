//! tape-config
//!
//! Run configuration: a single JSON document describing cash, sizing,
//! risk gates, execution model and strategy selection.
//!
//! Decimal values (`f64`) exist only here, at the boundary; everything
//! downstream is integer micros. Conversion rejects NaN/Inf and
//! out-of-range values instead of letting them corrupt the i64
//! representation.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use tape_events::MICROS_SCALE;

// ---------------------------------------------------------------------------
// Boundary conversion
// ---------------------------------------------------------------------------

/// Errors from decimal -> micros conversion. Both variants fire in all
/// build profiles; a silently elided guard here would let a broken
/// config corrupt every downstream computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input was NaN or infinite.
    NotFinite,
    /// Input would overflow i64 after scaling.
    OutOfRange,
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::NotFinite => write!(f, "to_micros: non-finite input (NaN or Inf)"),
            PricingError::OutOfRange => write!(f, "to_micros: value out of i64 range after scaling"),
        }
    }
}

impl std::error::Error for PricingError {}

/// Convert a decimal value to integer micros (round-to-nearest).
pub fn to_micros(value: f64) -> std::result::Result<i64, PricingError> {
    if !value.is_finite() {
        return Err(PricingError::NotFinite);
    }
    let scaled = value * MICROS_SCALE as f64;
    if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
        return Err(PricingError::OutOfRange);
    }
    Ok(scaled.round() as i64)
}

// ---------------------------------------------------------------------------
// Config document
// ---------------------------------------------------------------------------

fn default_fixed_order_qty() -> i64 {
    10
}

/// Execution model selection.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ExecutionConfig {
    /// Fill at the reference price, no costs.
    Immediate,
    /// Spread/slippage/impact cost model with a seeded PRNG.
    Cost {
        #[serde(default)]
        spread_fraction: f64,
        #[serde(default)]
        base_slippage_fraction: f64,
        #[serde(default)]
        impact_per_share: f64,
        #[serde(default)]
        slippage_volatility: f64,
        #[serde(default)]
        seed: u64,
    },
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig::Immediate
    }
}

/// One scripted trade leg.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedLeg {
    pub logical_time: i64,
    /// "BUY" or "SELL".
    pub side: String,
}

/// Strategy selection with per-variant parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    MeanReversion {
        window: usize,
        threshold: f64,
        #[serde(default)]
        symbol: Option<String>,
    },
    Momentum {
        fast: usize,
        slow: usize,
        signal: usize,
        #[serde(default)]
        symbol: Option<String>,
    },
    Scripted {
        symbol: String,
        legs: Vec<ScriptedLeg>,
    },
    OneShot {
        #[serde(default)]
        symbol: Option<String>,
    },
}

/// The whole run configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Starting cash, decimal units (> 0).
    pub initial_cash: f64,

    /// Quantity for every approved order (> 0).
    #[serde(default = "default_fixed_order_qty")]
    pub fixed_order_qty: i64,

    /// Risk gates, fractions in 0..=1; 0 disables a gate.
    #[serde(default)]
    pub max_drawdown: f64,
    #[serde(default)]
    pub max_order_value: f64,
    #[serde(default)]
    pub max_position_fraction: f64,
    #[serde(default)]
    pub max_total_exposure_fraction: f64,
    #[serde(default)]
    pub max_open_positions: Option<usize>,

    #[serde(default)]
    pub execution: ExecutionConfig,

    pub strategy: StrategyConfig,
}

impl RunConfig {
    /// Validate ranges and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            bail!("initial_cash must be a positive finite number");
        }
        if self.fixed_order_qty <= 0 {
            bail!("fixed_order_qty must be > 0");
        }
        for (name, value) in [
            ("max_drawdown", self.max_drawdown),
            ("max_position_fraction", self.max_position_fraction),
            (
                "max_total_exposure_fraction",
                self.max_total_exposure_fraction,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be a fraction in 0..=1, got {}", name, value);
            }
        }
        if !self.max_order_value.is_finite() || self.max_order_value < 0.0 {
            bail!("max_order_value must be >= 0");
        }
        if let Some(0) = self.max_open_positions {
            bail!("max_open_positions of 0 would reject every entry; omit the key to disable");
        }

        if let ExecutionConfig::Cost {
            spread_fraction,
            base_slippage_fraction,
            impact_per_share,
            slippage_volatility,
            ..
        } = &self.execution
        {
            for (name, value) in [
                ("spread_fraction", *spread_fraction),
                ("base_slippage_fraction", *base_slippage_fraction),
                ("impact_per_share", *impact_per_share),
                ("slippage_volatility", *slippage_volatility),
            ] {
                // Negative costs would produce systematically favorable
                // fills; rejected unconditionally.
                if !value.is_finite() || value < 0.0 {
                    bail!("{} must be >= 0, got {}", name, value);
                }
            }
        }

        if let StrategyConfig::MeanReversion { window, threshold, .. } = &self.strategy {
            if *window == 0 {
                bail!("mean_reversion window must be > 0");
            }
            if !threshold.is_finite() || *threshold < 0.0 {
                bail!("mean_reversion threshold must be >= 0");
            }
        }
        if let StrategyConfig::Momentum { fast, slow, signal, .. } = &self.strategy {
            if *fast == 0 || *signal == 0 || slow <= fast {
                bail!("momentum periods must satisfy 0 < fast < slow and signal > 0");
            }
        }
        if let StrategyConfig::Scripted { legs, .. } = &self.strategy {
            for leg in legs {
                if leg.side != "BUY" && leg.side != "SELL" {
                    bail!("scripted leg side must be BUY or SELL, got {:?}", leg.side);
                }
                if leg.logical_time < 0 {
                    bail!("scripted leg logical_time must be >= 0");
                }
            }
            if !legs.windows(2).all(|w| w[0].logical_time <= w[1].logical_time) {
                bail!("scripted legs must be in non-decreasing logical_time order");
            }
        }

        Ok(())
    }

    pub fn initial_cash_micros(&self) -> Result<i64> {
        to_micros(self.initial_cash).context("initial_cash")
    }
}

/// Parse and validate a config document.
pub fn parse(json: &str) -> Result<RunConfig> {
    let config: RunConfig = serde_json::from_str(json).context("parse run config JSON")?;
    config.validate()?;
    Ok(config)
}

/// Load, parse and validate a config file.
pub fn load_file(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
}
