//! The run loop: pop, dispatch, re-schedule, until the queue drains.
//!
//! States: Running -> Drained. The loop is not resumable once drained;
//! a new run needs a fresh scheduler and runner. A run either drains
//! the scheduler or fails fatally — there is no cancellation concept.

use tape_events::EventKind;

use crate::dispatcher::{Dispatcher, HandlerError};
use crate::scheduler::{Scheduler, SchedulerError};

/// Run loop states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Drained,
}

/// Run loop error variants.
#[derive(Debug)]
pub enum RunnerError {
    /// `drain` called on a runner that already finished (or failed).
    AlreadyDrained,
    /// A handler failed fatally. Carries enough context to name the
    /// violated invariant, the tick and the event class.
    Handler {
        logical_time: i64,
        kind: EventKind,
        source: HandlerError,
    },
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::AlreadyDrained => {
                write!(f, "run loop already drained; a fresh scheduler is required")
            }
            RunnerError::Handler {
                logical_time,
                kind,
                source,
            } => write!(
                f,
                "handler failed at logical_time {} while dispatching {}: {}",
                logical_time, kind, source
            ),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Handler { source, .. } => {
                let s: &(dyn std::error::Error + 'static) = &**source;
                Some(s)
            }
            RunnerError::AlreadyDrained => None,
        }
    }
}

/// Counters from one drained run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Events popped and dispatched.
    pub events_dispatched: u64,
    /// Follow-up events emitted by handlers and fed back in.
    pub events_emitted: u64,
}

/// Drives the scheduler/dispatcher pair to completion.
pub struct Runner {
    state: RunState,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            state: RunState::Running,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Pop -> dispatch -> re-schedule emitted events, until empty.
    ///
    /// # Errors
    /// `AlreadyDrained` when called twice; `Handler` when any handler
    /// fails, terminating the run immediately. Either way the runner
    /// ends up `Drained` — failed runs are not resumable either.
    pub fn drain(
        &mut self,
        scheduler: &mut Scheduler,
        dispatcher: &mut Dispatcher,
    ) -> Result<RunStats, RunnerError> {
        if self.state == RunState::Drained {
            return Err(RunnerError::AlreadyDrained);
        }

        let mut stats = RunStats::default();

        loop {
            let event = match scheduler.pop() {
                Ok(ev) => ev,
                Err(SchedulerError::EmptyQueue) => break,
            };

            let emitted = match dispatcher.dispatch(&event) {
                Ok(emitted) => emitted,
                Err(source) => {
                    self.state = RunState::Drained;
                    return Err(RunnerError::Handler {
                        logical_time: event.logical_time(),
                        kind: event.kind(),
                        source,
                    });
                }
            };

            stats.events_dispatched += 1;
            stats.events_emitted += emitted.len() as u64;

            for follow_up in emitted {
                scheduler.schedule(follow_up);
            }
        }

        self.state = RunState::Drained;
        Ok(stats)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
