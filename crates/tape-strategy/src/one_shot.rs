//! One-shot buy/sell: BUY on the first observation, SELL on the
//! second, then go quiet. A pipeline smoke strategy.

use tape_events::{Intent, Observation, Side};

use crate::Strategy;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Flat,
    Long,
    Done,
}

pub struct OneShotStrategy {
    symbol: Option<String>,
    phase: Phase,
}

impl OneShotStrategy {
    pub fn new(symbol: Option<String>) -> Self {
        Self {
            symbol,
            phase: Phase::Flat,
        }
    }
}

impl Strategy for OneShotStrategy {
    fn name(&self) -> &str {
        "one_shot"
    }

    fn on_observation(&mut self, obs: &Observation) -> Vec<Intent> {
        if let Some(sym) = &self.symbol {
            if obs.symbol != *sym {
                return Vec::new();
            }
        }

        match self.phase {
            Phase::Flat => {
                self.phase = Phase::Long;
                vec![Intent::new(
                    obs.logical_time,
                    obs.symbol.clone(),
                    Side::Buy,
                    obs.price_micros,
                )]
            }
            Phase::Long => {
                self.phase = Phase::Done;
                vec![Intent::new(
                    obs.logical_time,
                    obs.symbol.clone(),
                    Side::Sell,
                    obs.price_micros,
                )]
            }
            Phase::Done => Vec::new(),
        }
    }
}
