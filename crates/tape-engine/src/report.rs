use std::collections::BTreeMap;

use tape_events::Fill;
use tape_exec::CostTotals;
use tape_kernel::RunStats;
use tape_ledger::Position;
use tape_risk::Rejection;

/// Everything a completed run yields: the consistent final ledger view
/// plus the accounting of rejections and simulated costs.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub initial_cash_micros: i64,
    pub final_cash_micros: i64,
    pub realized_pnl_micros: i64,
    pub final_equity_micros: i64,
    /// Positions still open at drain time.
    pub positions: BTreeMap<String, Position>,
    /// Equity series: (logical_time, equity_micros), monotone ticks.
    pub equity_curve: Vec<(i64, i64)>,
    /// Every fill applied, in application order.
    pub fills: Vec<Fill>,
    /// Every admission rejection, in evaluation order.
    pub rejections: Vec<Rejection>,
    /// Simulated execution costs (cost-model runs only).
    pub cost_totals: Option<CostTotals>,
    pub stats: RunStats,
}

impl RunReport {
    /// Total return: final equity vs initial cash.
    pub fn total_return_micros(&self) -> i64 {
        self.final_equity_micros - self.initial_cash_micros
    }

    /// Rejection totals keyed by check name.
    pub fn rejection_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rejections {
            *counts.entry(r.check.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
