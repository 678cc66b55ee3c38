use super::RunContext;
use crate::error::RunError;
use crate::report::{ExecutionReport, ResultStore};
use crate::strategy::ExecutionStrategy;

/// Evaluates nodes one at a time in schedule order on the calling thread.
pub struct SequentialStrategy;

impl ExecutionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(&self, ctx: &RunContext<'_>) -> Result<ExecutionReport, RunError> {
        let order = &ctx.plan().schedule().order;
        let mut store = ResultStore::with_capacity(order.len());
        for id in order {
            let result = ctx.evaluate(id, &store)?;
            store.insert(id.clone(), result)?;
        }
        Ok(store.into_report())
    }
}
