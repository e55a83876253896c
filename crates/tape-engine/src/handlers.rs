//! Handler adapters between the kernel's dispatch contract and the
//! domain subsystems. Each adapter is registered for exactly one event
//! kind; the `if let` keeps them total over the event union.

use std::cell::RefCell;
use std::rc::Rc;

use tape_events::Event;
use tape_exec::{Execution, ExecutionModel};
use tape_kernel::{EventHandler, HandlerError, HandlerResult};
use tape_ledger::Ledger;
use tape_risk::{AdmissionController, AdmissionOutcome};
use tape_strategy::Strategy;

/// Observation -> ledger mark-to-market. Runs before any strategy
/// handler (registration order), so same-tick intents read fresh marks.
pub(crate) struct MarkToMarketHandler {
    pub(crate) ledger: Rc<RefCell<Ledger>>,
}

impl EventHandler for MarkToMarketHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        if let Event::Observation(obs) = event {
            self.ledger.borrow_mut().handle_observation(obs);
        }
        Ok(Vec::new())
    }
}

/// Observation -> strategy intents.
pub(crate) struct StrategyHandler {
    pub(crate) strategy: Box<dyn Strategy>,
}

impl EventHandler for StrategyHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        if let Event::Observation(obs) = event {
            let intents = self.strategy.on_observation(obs);
            return Ok(intents.into_iter().map(Event::Intent).collect());
        }
        Ok(Vec::new())
    }
}

/// Intent -> order (or recorded rejection).
pub(crate) struct AdmissionHandler {
    pub(crate) admission: Rc<RefCell<AdmissionController>>,
    pub(crate) ledger: Rc<RefCell<Ledger>>,
}

impl EventHandler for AdmissionHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        if let Event::Intent(intent) = event {
            let outcome = {
                let ledger = self.ledger.borrow();
                self.admission.borrow_mut().evaluate(intent, &ledger)
            }
            .map_err(|e| -> HandlerError { Box::new(e) })?;

            match outcome {
                AdmissionOutcome::Approved(order) => {
                    tracing::debug!(
                        symbol = %order.symbol,
                        side = %order.side,
                        qty = order.qty,
                        "intent approved"
                    );
                    return Ok(vec![Event::Order(order)]);
                }
                AdmissionOutcome::Rejected(rejection) => {
                    tracing::warn!(
                        check = rejection.check.as_str(),
                        symbol = %rejection.symbol,
                        logical_time = rejection.logical_time,
                        reason = %rejection.reason,
                        "intent rejected"
                    );
                }
            }
        }
        Ok(Vec::new())
    }
}

/// Order -> fill.
pub(crate) struct ExecutionHandler {
    pub(crate) execution: Rc<RefCell<Execution>>,
}

impl EventHandler for ExecutionHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        if let Event::Order(order) = event {
            let fill = self.execution.borrow_mut().fill(order);
            return Ok(vec![Event::Fill(fill)]);
        }
        Ok(Vec::new())
    }
}

/// Fill -> ledger accounting. The only write path into positions,
/// cash and realized PnL.
pub(crate) struct FillHandler {
    pub(crate) ledger: Rc<RefCell<Ledger>>,
}

impl EventHandler for FillHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        if let Event::Fill(fill) = event {
            self.ledger
                .borrow_mut()
                .apply_fill(fill)
                .map_err(|e| -> HandlerError { Box::new(e) })?;
            tracing::debug!(
                symbol = %fill.symbol,
                side = %fill.side,
                qty = fill.qty,
                price_micros = fill.fill_price_micros,
                "fill applied"
            );
        }
        Ok(Vec::new())
    }
}
