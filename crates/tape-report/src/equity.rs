//! Equity-series analysis: peak, trough, max drawdown, drawdown
//! duration.

use std::collections::BTreeMap;

use tape_events::MICROS_SCALE;

/// Drawdown statistics over a run's equity series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquityAnalyzer {
    peak_equity_micros: i64,
    trough_equity_micros: i64,
    final_equity_micros: i64,
    /// Largest peak-to-trough decline as a micros fraction of the peak.
    max_drawdown_micros: i64,
    /// Longest stretch of consecutive samples below a prior peak.
    longest_drawdown_samples: usize,
}

impl EquityAnalyzer {
    /// Analyze an equity series keyed by logical_time. Empty input
    /// yields all-zero statistics.
    pub fn from_samples(samples: &BTreeMap<i64, i64>) -> Self {
        let mut peak: Option<i64> = None;
        let mut trough: Option<i64> = None;
        let mut last: i64 = 0;
        let mut max_drawdown: i64 = 0;
        let mut current_underwater: usize = 0;
        let mut longest_underwater: usize = 0;

        for equity in samples.values() {
            let equity = *equity;
            last = equity;

            match peak {
                None => peak = Some(equity),
                Some(p) if equity > p => peak = Some(equity),
                Some(_) => {}
            }
            match trough {
                None => trough = Some(equity),
                Some(t) if equity < t => trough = Some(equity),
                Some(_) => {}
            }

            let p = peak.unwrap_or(0);
            if equity < p {
                current_underwater += 1;
                longest_underwater = longest_underwater.max(current_underwater);
                if p > 0 {
                    let dd = ((p as i128 - equity as i128) * MICROS_SCALE as i128 / p as i128)
                        as i64;
                    max_drawdown = max_drawdown.max(dd);
                }
            } else {
                current_underwater = 0;
            }
        }

        Self {
            peak_equity_micros: peak.unwrap_or(0),
            trough_equity_micros: trough.unwrap_or(0),
            final_equity_micros: last,
            max_drawdown_micros: max_drawdown,
            longest_drawdown_samples: longest_underwater,
        }
    }

    pub fn peak_equity_micros(&self) -> i64 {
        self.peak_equity_micros
    }

    pub fn trough_equity_micros(&self) -> i64 {
        self.trough_equity_micros
    }

    pub fn final_equity_micros(&self) -> i64 {
        self.final_equity_micros
    }

    /// Max drawdown as a micros fraction (1_000_000 = wiped out).
    pub fn max_drawdown_micros(&self) -> i64 {
        self.max_drawdown_micros
    }

    pub fn longest_drawdown_samples(&self) -> usize {
        self.longest_drawdown_samples
    }
}
