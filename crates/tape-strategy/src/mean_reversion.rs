//! Rolling mean reversion with an absolute threshold.
//!
//! Maintain a rolling window of prices; BUY when the price drops below
//! mean - threshold (if flat), SELL when it recovers to the mean (if
//! long). Repeats indefinitely.

use std::collections::VecDeque;

use tape_events::{Intent, Observation, Side};

use crate::Strategy;

pub struct RollingMeanReversion {
    window: usize,
    threshold_micros: i64,
    /// None = react to every symbol (single-symbol tapes).
    symbol: Option<String>,
    prices: VecDeque<i64>,
    long: bool,
}

impl RollingMeanReversion {
    pub fn new(window: usize, threshold_micros: i64, symbol: Option<String>) -> Self {
        debug_assert!(window > 0, "window must be > 0");
        debug_assert!(threshold_micros >= 0, "threshold must be >= 0");
        Self {
            window,
            threshold_micros,
            symbol,
            prices: VecDeque::with_capacity(window),
            long: false,
        }
    }

    fn mean_micros(&self) -> i64 {
        let sum: i128 = self.prices.iter().map(|p| *p as i128).sum();
        (sum / self.prices.len() as i128) as i64
    }
}

impl Strategy for RollingMeanReversion {
    fn name(&self) -> &str {
        "rolling_mean_reversion"
    }

    fn on_observation(&mut self, obs: &Observation) -> Vec<Intent> {
        if let Some(sym) = &self.symbol {
            if obs.symbol != *sym {
                return Vec::new();
            }
        }

        if self.prices.len() == self.window {
            self.prices.pop_front();
        }
        self.prices.push_back(obs.price_micros);

        // not enough data to trust the mean yet
        if self.prices.len() < self.window {
            return Vec::new();
        }

        let mean = self.mean_micros();
        let lower_band = mean - self.threshold_micros;

        if !self.long && obs.price_micros < lower_band {
            self.long = true;
            return vec![Intent::new(
                obs.logical_time,
                obs.symbol.clone(),
                Side::Buy,
                obs.price_micros,
            )];
        }

        if self.long && obs.price_micros >= mean {
            self.long = false;
            return vec![Intent::new(
                obs.logical_time,
                obs.symbol.clone(),
                Side::Sell,
                obs.price_micros,
            )];
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_events::MICROS_SCALE;

    const M: i64 = MICROS_SCALE;

    fn feed(s: &mut RollingMeanReversion, prices: &[i64]) -> Vec<(i64, Side)> {
        let mut signals = Vec::new();
        for (t, p) in prices.iter().enumerate() {
            for intent in s.on_observation(&Observation::new(t as i64, "AAPL", p * M)) {
                signals.push((intent.logical_time, intent.side));
            }
        }
        signals
    }

    #[test]
    fn silent_during_warmup() {
        let mut s = RollingMeanReversion::new(5, 2 * M, None);
        let signals = feed(&mut s, &[100, 100, 100, 100]);
        assert!(signals.is_empty());
    }

    #[test]
    fn buys_below_band_and_sells_at_mean() {
        // Window 3, threshold 2. After [100, 100, 100] the mean is 100;
        // 90 is far below the band -> BUY (window now [100,100,90],
        // mean 96). The rebound to 100 >= mean -> SELL.
        let mut s = RollingMeanReversion::new(3, 2 * M, None);
        let signals = feed(&mut s, &[100, 100, 100, 90, 100]);
        assert_eq!(signals, vec![(3, Side::Buy), (4, Side::Sell)]);
    }

    #[test]
    fn does_not_rebuy_while_long() {
        let mut s = RollingMeanReversion::new(3, 2 * M, None);
        let signals = feed(&mut s, &[100, 100, 100, 90, 85, 80]);
        // only the first dip buys; the slide deepens but we're already in
        assert_eq!(signals, vec![(3, Side::Buy)]);
    }

    #[test]
    fn ignores_other_symbols_when_pinned() {
        let mut s = RollingMeanReversion::new(2, M, Some("AAPL".to_string()));
        let out = s.on_observation(&Observation::new(0, "MSFT", 100 * M));
        assert!(out.is_empty());
        assert!(s.prices.is_empty()); // not even window updates
    }

    #[test]
    fn intents_carry_the_observation_tick_and_price() {
        let mut s = RollingMeanReversion::new(2, 0, None);
        s.on_observation(&Observation::new(0, "AAPL", 100 * M));
        let out = s.on_observation(&Observation::new(1, "AAPL", 90 * M));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].logical_time, 1);
        assert_eq!(out[0].reference_price_micros, 90 * M);
        assert_eq!(out[0].symbol, "AAPL");
    }
}
