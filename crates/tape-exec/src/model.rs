use tape_events::{Fill, Order};

use crate::costs::{CostModelExecution, CostTotals};

/// Converts an approved order into a fill.
///
/// Implementations are infallible: an order that reached execution has
/// already passed admission control, and the simulated market always
/// fills. Ledger-level invariants still apply when the fill lands.
pub trait ExecutionModel {
    fn fill(&mut self, order: &Order) -> Fill;
}

/// Base variant: deterministic, costless. `fill_price = reference_price`.
pub struct ImmediateExecution;

impl ExecutionModel for ImmediateExecution {
    fn fill(&mut self, order: &Order) -> Fill {
        Fill::new(
            order.logical_time,
            order.symbol.clone(),
            order.side,
            order.qty,
            order.reference_price_micros,
        )
    }
}

/// The shipped execution variants, selected by configuration.
///
/// Custom models plug in through [`ExecutionModel`]; this enum exists
/// so the engine can report cost totals without downcasting.
pub enum Execution {
    Immediate(ImmediateExecution),
    Cost(CostModelExecution),
}

impl Execution {
    pub fn immediate() -> Self {
        Execution::Immediate(ImmediateExecution)
    }

    /// Accumulated cost totals, if this variant tracks them.
    pub fn cost_totals(&self) -> Option<CostTotals> {
        match self {
            Execution::Immediate(_) => None,
            Execution::Cost(m) => Some(*m.totals()),
        }
    }
}

impl ExecutionModel for Execution {
    fn fill(&mut self, order: &Order) -> Fill {
        match self {
            Execution::Immediate(m) => m.fill(order),
            Execution::Cost(m) => m.fill(order),
        }
    }
}
