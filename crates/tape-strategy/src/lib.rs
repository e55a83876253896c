//! tape-strategy
//!
//! The strategy contract plus the shipped implementations.
//!
//! Strategies are stateful observers of the market tape: each
//! observation may produce zero or more trade intents. They never size
//! trades (admission control does), never touch the ledger, and hold
//! only their own private state (rolling windows, crossover memory).

mod crossover;
mod mean_reversion;
mod one_shot;
mod scripted;

pub use crossover::MomentumCrossover;
pub use mean_reversion::RollingMeanReversion;
pub use one_shot::OneShotStrategy;
pub use scripted::ScriptedStrategy;

use tape_events::{Intent, Observation};

/// A producer of trade intents, polymorphic over strategy variants and
/// stateful across calls.
pub trait Strategy {
    fn name(&self) -> &str;

    /// React to one market observation with zero, one or more intents.
    fn on_observation(&mut self, obs: &Observation) -> Vec<Intent>;
}
