//! tape-ledger
//!
//! The portfolio ledger: the single source of truth for accounting
//! state during a replay.
//!
//! - Fills are the only mutator of cash / positions / realized PnL
//! - Weighted-average cost per position; flat positions are removed
//! - Observations only move marks and the derived equity series
//! - cash >= 0 after every applied fill, enforced all-or-nothing
//!
//! Pure deterministic logic: no IO, no time, no randomness. Two ledgers
//! fed the same fill/observation sequence always produce identical
//! state.

mod ledger;
mod types;

pub use ledger::{Ledger, LedgerError};
pub use types::Position;

use std::collections::BTreeMap;

/// Canonical mark map type (symbol -> latest price_micros).
pub type MarkMap = BTreeMap<String, i64>;
