//! tape-engine
//!
//! Wires the kernel to the domain: ledger mark-to-market and fill
//! application, admission control, execution and strategies, behind a
//! `Simulation` façade that seeds observations and drains the run.
//!
//! Pipeline per tick (enforced by scheduler type precedence, not by
//! convention): OBSERVATION -> ledger marks, strategies emit intents
//! -> INTENT -> admission sizes or rejects -> ORDER -> execution fills
//! -> FILL -> ledger accounts.
//!
//! The ledger is the only shared mutable resource. Handlers reach it
//! through `Rc<RefCell<_>>`; borrows are scoped to a single handler
//! call and the dispatch loop is strictly sequential, so writes are
//! serialized by construction — no locks.

mod handlers;
mod report;
mod simulation;

pub use report::RunReport;
pub use simulation::{SimError, Simulation};
