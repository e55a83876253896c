//! tape-exec
//!
//! Order → fill simulation.
//!
//! - `ImmediateExecution`: fills at the order's reference price
//! - `CostModelExecution`: half-spread + base slippage + size impact +
//!   seeded uniform random slippage, with running cost totals
//!
//! All randomness flows through an injectable seeded `ChaCha8Rng`;
//! identical seeds produce identical fill sequences. Cost totals are
//! observational only — they never feed back into scheduling or
//! admission decisions within a run.

mod costs;
mod model;

pub use costs::{CostModelConfig, CostModelExecution, CostTotals};
pub use model::{Execution, ExecutionModel, ImmediateExecution};
