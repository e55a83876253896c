//! Scripted strategy: emits predetermined sides at predetermined ticks.
//!
//! The harness strategy for exercising the pipeline — admission
//! rejections, crash handling, determinism — without indicator noise.

use tape_events::{Intent, Observation, Side};

use crate::Strategy;

pub struct ScriptedStrategy {
    symbol: String,
    /// (logical_time, side) legs in non-decreasing time order.
    legs: Vec<(i64, Side)>,
    next: usize,
}

impl ScriptedStrategy {
    pub fn new<S: Into<String>>(symbol: S, legs: Vec<(i64, Side)>) -> Self {
        debug_assert!(
            legs.windows(2).all(|w| w[0].0 <= w[1].0),
            "legs must be in non-decreasing logical_time order"
        );
        Self {
            symbol: symbol.into(),
            legs,
            next: 0,
        }
    }

    /// Legs not yet fired.
    pub fn remaining(&self) -> usize {
        self.legs.len() - self.next
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn on_observation(&mut self, obs: &Observation) -> Vec<Intent> {
        if obs.symbol != self.symbol {
            return Vec::new();
        }

        let mut out = Vec::new();
        while self.next < self.legs.len() && self.legs[self.next].0 == obs.logical_time {
            let (_, side) = self.legs[self.next];
            self.next += 1;
            out.push(Intent::new(
                obs.logical_time,
                obs.symbol.clone(),
                side,
                obs.price_micros,
            ));
        }
        out
    }
}
