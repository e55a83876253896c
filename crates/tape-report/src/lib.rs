//! tape-report
//!
//! Post-run analysis. Consumes only what the kernel guarantees after a
//! completed run: the ordered fill history and the equity series
//! (exactly one sample per applied tick, monotone keys). Never part of
//! the run loop.

mod equity;
mod metrics;

pub use equity::EquityAnalyzer;
pub use metrics::TradeMetrics;
