//! tape-risk
//!
//! Admission control: the policy layer deciding whether a trade intent
//! becomes an executable order.
//!
//! - Fixed-quantity sizing (quantity is configuration, not intent data)
//! - Checks run in a fixed order and short-circuit on first failure:
//!   drawdown, position sizing, cash, position count
//! - Rejections are normal business outcomes, recorded with reason and
//!   triggering check — never errors, never a halt
//! - All checks read ledger state as of the most recent observation or
//!   fill already applied; the scheduler's type precedence guarantees
//!   that state is current for the intent's tick
//!
//! Pure deterministic logic, no IO.

mod engine;
mod types;

pub use engine::AdmissionController;
pub use types::{AdmissionOutcome, CheckKind, Rejection, RiskConfig, RiskError};
