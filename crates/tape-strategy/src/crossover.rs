//! Momentum crossover (MACD-style), integer-micros arithmetic.
//!
//! MACD = EMA(fast) - EMA(slow); signal = EMA(signal_period) of MACD;
//! histogram = MACD - signal. BUY when MACD crosses above the signal
//! line with a positive histogram (if flat); SELL when it crosses
//! below with a negative histogram (if long).

use tape_events::{Intent, Observation, Side};

use crate::Strategy;

/// One integer EMA step: ema += 2 * (value - ema) / (period + 1).
fn ema_step(prev: i64, value: i64, period: usize) -> i64 {
    let prev = prev as i128;
    let delta = 2 * (value as i128 - prev) / (period as i128 + 1);
    (prev + delta) as i64
}

pub struct MomentumCrossover {
    symbol: Option<String>,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    fast_ema: Option<i64>,
    slow_ema: Option<i64>,
    signal_ema: Option<i64>,
    samples: usize,
    prev: Option<(i64, i64)>, // (macd, signal) from the previous tick
    long: bool,
}

impl MomentumCrossover {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
        symbol: Option<String>,
    ) -> Self {
        debug_assert!(fast_period > 0 && slow_period > fast_period && signal_period > 0);
        Self {
            symbol,
            fast_period,
            slow_period,
            signal_period,
            fast_ema: None,
            slow_ema: None,
            signal_ema: None,
            samples: 0,
            prev: None,
            long: false,
        }
    }

    /// Standard 12/26/9 parameterization.
    pub fn standard(symbol: Option<String>) -> Self {
        Self::new(12, 26, 9, symbol)
    }
}

impl Strategy for MomentumCrossover {
    fn name(&self) -> &str {
        "momentum_crossover"
    }

    fn on_observation(&mut self, obs: &Observation) -> Vec<Intent> {
        if let Some(sym) = &self.symbol {
            if obs.symbol != *sym {
                return Vec::new();
            }
        }

        self.samples += 1;
        let price = obs.price_micros;
        self.fast_ema = Some(match self.fast_ema {
            None => price,
            Some(e) => ema_step(e, price, self.fast_period),
        });
        self.slow_ema = Some(match self.slow_ema {
            None => price,
            Some(e) => ema_step(e, price, self.slow_period),
        });

        // EMAs need the slow window's worth of samples before the MACD
        // line means anything
        if self.samples < self.slow_period {
            return Vec::new();
        }

        let macd = self.fast_ema.unwrap_or(0) - self.slow_ema.unwrap_or(0);
        let signal = match self.signal_ema {
            None => macd,
            Some(e) => ema_step(e, macd, self.signal_period),
        };
        self.signal_ema = Some(signal);
        let histogram = macd - signal;

        let out = match self.prev {
            Some((prev_macd, prev_signal)) => {
                if !self.long && prev_macd <= prev_signal && macd > signal && histogram > 0 {
                    self.long = true;
                    vec![Intent::new(
                        obs.logical_time,
                        obs.symbol.clone(),
                        Side::Buy,
                        price,
                    )]
                } else if self.long && prev_macd >= prev_signal && macd < signal && histogram < 0 {
                    self.long = false;
                    vec![Intent::new(
                        obs.logical_time,
                        obs.symbol.clone(),
                        Side::Sell,
                        price,
                    )]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };

        self.prev = Some((macd, signal));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_events::MICROS_SCALE;

    const M: i64 = MICROS_SCALE;

    fn run(s: &mut MomentumCrossover, prices: &[i64]) -> Vec<Side> {
        let mut signals = Vec::new();
        for (t, p) in prices.iter().enumerate() {
            for intent in s.on_observation(&Observation::new(t as i64, "SPY", p * M)) {
                signals.push(intent.side);
            }
        }
        signals
    }

    /// Long slide then a strong sustained rally then a crash again.
    fn v_shaped_tape() -> Vec<i64> {
        let mut prices = Vec::new();
        let mut p = 300;
        for _ in 0..30 {
            prices.push(p);
            p -= 2;
        }
        for _ in 0..25 {
            prices.push(p);
            p += 6;
        }
        for _ in 0..25 {
            prices.push(p);
            p -= 6;
        }
        prices
    }

    #[test]
    fn silent_during_warmup() {
        let mut s = MomentumCrossover::new(3, 6, 3, None);
        let signals = run(&mut s, &[100, 101, 102, 103, 104]);
        assert!(signals.is_empty());
    }

    #[test]
    fn buys_into_the_rally_and_exits_the_reversal() {
        let mut s = MomentumCrossover::new(5, 10, 4, None);
        let signals = run(&mut s, &v_shaped_tape());

        assert!(!signals.is_empty(), "expected at least one signal");
        assert_eq!(signals[0], Side::Buy, "first signal must open, not close");
        // strictly alternating by construction of the state machine
        for pair in signals.windows(2) {
            assert_ne!(pair[0], pair[1], "signals must alternate");
        }
    }

    #[test]
    fn ema_step_converges_toward_input() {
        let mut ema = 100 * M;
        for _ in 0..100 {
            ema = ema_step(ema, 200 * M, 5);
        }
        // close to 200 after many steps (integer truncation leaves a gap)
        assert!((ema - 200 * M).abs() < M / 100, "ema = {}", ema);
    }

    #[test]
    fn pinned_symbol_filters_the_tape() {
        let mut s = MomentumCrossover::standard(Some("SPY".to_string()));
        let out = s.on_observation(&Observation::new(0, "QQQ", 100 * M));
        assert!(out.is_empty());
        assert_eq!(s.samples, 0);
    }
}
