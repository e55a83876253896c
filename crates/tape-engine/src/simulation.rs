use std::cell::RefCell;
use std::rc::Rc;

use tape_events::{EventKind, Observation};
use tape_exec::Execution;
use tape_kernel::{Dispatcher, Runner, RunnerError, Scheduler};
use tape_ledger::Ledger;
use tape_risk::{AdmissionController, RiskConfig};
use tape_strategy::Strategy;

use crate::handlers::{
    AdmissionHandler, ExecutionHandler, FillHandler, MarkToMarketHandler, StrategyHandler,
};
use crate::report::RunReport;

/// Simulation error variants.
#[derive(Debug)]
pub enum SimError {
    /// The run loop failed: a handler surfaced a fatal invariant
    /// violation, or `run` was called on a drained simulation.
    Runner(RunnerError),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Runner(e) => write!(f, "simulation failed: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Runner(e) => Some(e),
        }
    }
}

impl From<RunnerError> for SimError {
    fn from(e: RunnerError) -> Self {
        SimError::Runner(e)
    }
}

/// One bounded replay: seed observations, register strategies, drain.
///
/// Not resumable — a finished (or failed) simulation stays drained and
/// a fresh one is required for another run.
pub struct Simulation {
    scheduler: Scheduler,
    dispatcher: Dispatcher,
    runner: Runner,
    ledger: Rc<RefCell<Ledger>>,
    admission: Rc<RefCell<AdmissionController>>,
    execution: Rc<RefCell<Execution>>,
    observations_seeded: u64,
}

impl Simulation {
    pub fn new(initial_cash_micros: i64, risk: RiskConfig, execution: Execution) -> Self {
        let ledger = Rc::new(RefCell::new(Ledger::new(initial_cash_micros)));
        let admission = Rc::new(RefCell::new(AdmissionController::new(risk)));
        let execution = Rc::new(RefCell::new(execution));

        let mut dispatcher = Dispatcher::new();
        // Mark-to-market first: strategies registered later on the same
        // kind always observe fresh marks.
        dispatcher.register(
            EventKind::Observation,
            Box::new(MarkToMarketHandler {
                ledger: Rc::clone(&ledger),
            }),
        );
        dispatcher.register(
            EventKind::Intent,
            Box::new(AdmissionHandler {
                admission: Rc::clone(&admission),
                ledger: Rc::clone(&ledger),
            }),
        );
        dispatcher.register(
            EventKind::Order,
            Box::new(ExecutionHandler {
                execution: Rc::clone(&execution),
            }),
        );
        dispatcher.register(
            EventKind::Fill,
            Box::new(FillHandler {
                ledger: Rc::clone(&ledger),
            }),
        );

        Self {
            scheduler: Scheduler::new(),
            dispatcher,
            runner: Runner::new(),
            ledger,
            admission,
            execution,
            observations_seeded: 0,
        }
    }

    /// Register a strategy. Any number may be registered; they see
    /// observations in registration order.
    pub fn add_strategy(&mut self, strategy: Box<dyn Strategy>) {
        tracing::debug!(name = strategy.name(), "strategy registered");
        self.dispatcher
            .register(EventKind::Observation, Box::new(StrategyHandler { strategy }));
    }

    /// Seed the scheduler with the market tape.
    pub fn seed_observations<I>(&mut self, observations: I)
    where
        I: IntoIterator<Item = Observation>,
    {
        for obs in observations {
            self.scheduler.schedule(obs.into());
            self.observations_seeded += 1;
        }
    }

    /// Read access to the ledger (tests, diagnostics). Writes stay
    /// inside the dispatch cycle.
    pub fn ledger(&self) -> std::cell::Ref<'_, Ledger> {
        self.ledger.borrow()
    }

    /// Drain the scheduler to completion and report.
    ///
    /// # Errors
    /// [`SimError::Runner`] — a fatal invariant violation, with the
    /// logical_time and event kind in the diagnostic; or a second call
    /// on an already-drained simulation.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        tracing::info!(
            observations = self.observations_seeded,
            "run loop starting"
        );
        let stats = self.runner.drain(&mut self.scheduler, &mut self.dispatcher)?;

        let ledger = self.ledger.borrow();
        let admission = self.admission.borrow();
        let report = RunReport {
            initial_cash_micros: ledger.initial_cash_micros(),
            final_cash_micros: ledger.cash_micros(),
            realized_pnl_micros: ledger.realized_pnl_micros(),
            final_equity_micros: ledger.equity_micros(),
            positions: ledger.positions().clone(),
            equity_curve: ledger
                .equity_samples()
                .iter()
                .map(|(t, eq)| (*t, *eq))
                .collect(),
            fills: ledger.fills().to_vec(),
            rejections: admission.rejections().to_vec(),
            cost_totals: self.execution.borrow().cost_totals(),
            stats,
        };

        tracing::info!(
            events_dispatched = stats.events_dispatched,
            fills = report.fills.len(),
            rejections = report.rejections.len(),
            final_equity_micros = report.final_equity_micros,
            realized_pnl_micros = report.realized_pnl_micros,
            "run drained"
        );
        Ok(report)
    }
}
