use crate::error::RunError;
use crate::executor::{ParallelStrategy, RunContext, SequentialStrategy};
use crate::report::ExecutionReport;
use serde::{Deserialize, Serialize};

/// A way of walking a scheduled plan and filling the result store.
/// A strategy only decides *when* nodes run; how a single node is resolved and
/// invoked is shared through [`RunContext::evaluate`].
pub trait ExecutionStrategy: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Evaluates every node of the plan exactly once.
    fn execute(&self, ctx: &RunContext<'_>) -> Result<ExecutionReport, RunError>;
}

/// The available execution strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyChoice {
    /// One node at a time in schedule order. Deterministic, no threads.
    #[default]
    Sequential,
    /// Independent nodes of each wave run on the rayon pool.
    Parallel,
}

impl StrategyChoice {
    pub fn strategy(self) -> Box<dyn ExecutionStrategy> {
        match self {
            StrategyChoice::Sequential => Box::new(SequentialStrategy),
            StrategyChoice::Parallel => Box::new(ParallelStrategy),
        }
    }
}
