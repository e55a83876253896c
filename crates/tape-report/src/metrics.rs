//! Per-trade performance metrics from the fill history.
//!
//! Fills are paired into round trips per symbol: a BUY opens (or
//! extends, blending the entry), a SELL against an open entry realizes
//! `(sell - entry) * qty`. Short round trips mirror with the signs
//! flipped. This is reporting arithmetic over completed runs, not
//! ledger accounting — the ledger's realized PnL stays authoritative.

use std::collections::BTreeMap;

use tape_events::{Fill, Side, MICROS_SCALE};

struct OpenLeg {
    qty: i64,
    entry_price_micros: i64,
}

/// Summary statistics over a run's fills.
pub struct TradeMetrics {
    initial_cash_micros: i64,
    final_equity_micros: i64,
    trade_pnls_micros: Vec<i64>,
}

impl TradeMetrics {
    pub fn from_fills(fills: &[Fill], initial_cash_micros: i64, final_equity_micros: i64) -> Self {
        Self {
            initial_cash_micros,
            final_equity_micros,
            trade_pnls_micros: round_trip_pnls(fills),
        }
    }

    /// PnL of each completed round trip, in fill order.
    pub fn trade_pnls_micros(&self) -> &[i64] {
        &self.trade_pnls_micros
    }

    pub fn num_trades(&self) -> usize {
        self.trade_pnls_micros.len()
    }

    /// Winning round trips / total round trips. 0.0 when no trades.
    pub fn win_rate(&self) -> f64 {
        if self.trade_pnls_micros.is_empty() {
            return 0.0;
        }
        let wins = self.trade_pnls_micros.iter().filter(|p| **p > 0).count();
        wins as f64 / self.trade_pnls_micros.len() as f64
    }

    pub fn avg_pnl_per_trade_micros(&self) -> i64 {
        if self.trade_pnls_micros.is_empty() {
            return 0;
        }
        let sum: i128 = self.trade_pnls_micros.iter().map(|p| *p as i128).sum();
        (sum / self.trade_pnls_micros.len() as i128) as i64
    }

    /// Total return including open-position value: final equity minus
    /// initial cash.
    pub fn total_return_micros(&self) -> i64 {
        self.final_equity_micros - self.initial_cash_micros
    }

    /// Total return as a fraction of initial cash (micros-scaled).
    pub fn total_return_fraction_micros(&self) -> i64 {
        if self.initial_cash_micros == 0 {
            return 0;
        }
        (self.total_return_micros() as i128 * MICROS_SCALE as i128
            / self.initial_cash_micros as i128) as i64
    }
}

/// Pair fills into per-symbol round trips.
fn round_trip_pnls(fills: &[Fill]) -> Vec<i64> {
    let mut open: BTreeMap<String, OpenLeg> = BTreeMap::new();
    let mut pnls = Vec::new();

    for fill in fills {
        let signed_qty = match fill.side {
            Side::Buy => fill.qty,
            Side::Sell => -fill.qty,
        };

        match open.remove(&fill.symbol) {
            None => {
                open.insert(
                    fill.symbol.clone(),
                    OpenLeg {
                        qty: signed_qty,
                        entry_price_micros: fill.fill_price_micros,
                    },
                );
            }
            Some(mut leg) if (leg.qty > 0) == (signed_qty > 0) => {
                // same direction: extend, blending the entry price
                let total = leg.qty as i128 * leg.entry_price_micros as i128
                    + signed_qty as i128 * fill.fill_price_micros as i128;
                leg.qty += signed_qty;
                leg.entry_price_micros = (total / leg.qty as i128) as i64;
                open.insert(fill.symbol.clone(), leg);
            }
            Some(leg) => {
                // opposite direction: close (all or part) and realize
                let closing = leg.qty.abs().min(signed_qty.abs());
                let direction: i128 = if leg.qty > 0 { 1 } else { -1 };
                let pnl = closing as i128
                    * (fill.fill_price_micros as i128 - leg.entry_price_micros as i128)
                    * direction;
                pnls.push(pnl as i64);

                let remaining = leg.qty + signed_qty;
                if remaining != 0 {
                    // a surplus that flipped through zero re-enters at
                    // the closing fill's price
                    let entry_price_micros = if (remaining > 0) == (leg.qty > 0) {
                        leg.entry_price_micros
                    } else {
                        fill.fill_price_micros
                    };
                    open.insert(
                        fill.symbol.clone(),
                        OpenLeg {
                            qty: remaining,
                            entry_price_micros,
                        },
                    );
                }
            }
        }
    }

    pnls
}
