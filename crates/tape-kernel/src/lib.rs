//! tape-kernel
//!
//! The event kernel: scheduler, dispatcher, run loop.
//!
//! - `Scheduler`: priority queue over events; total order =
//!   (logical_time, kind precedence, insertion sequence)
//! - `Dispatcher`: kind-keyed fan-out to any number of handlers,
//!   invoked in registration order
//! - `Runner`: pop -> dispatch -> re-schedule until the queue drains
//!
//! Single-threaded and synchronous by design: global causal order is
//! only cheap to guarantee without concurrent mutation. No handler
//! suspends or yields mid-step; `dispatch` runs every handler for one
//! event to completion before the loop requests the next event.

mod dispatcher;
mod runner;
mod scheduler;

pub use dispatcher::{Dispatcher, EventHandler, HandlerError, HandlerResult};
pub use runner::{RunState, RunStats, Runner, RunnerError};
pub use scheduler::{Scheduler, SchedulerError};
