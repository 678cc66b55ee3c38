use super::RunContext;
use crate::error::{NodeErrorKind, RunError};
use crate::report::{ExecutionReport, ExecutionResult, ResultStore};
use crate::strategy::ExecutionStrategy;
use rayon::prelude::*;

/// Evaluates one wave at a time. Nodes inside a wave only read results of
/// earlier waves, so they run concurrently against a shared, read-only store;
/// the driver commits their outcomes in ascending id order once the wave ends.
pub struct ParallelStrategy;

impl ExecutionStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute(&self, ctx: &RunContext<'_>) -> Result<ExecutionReport, RunError> {
        let schedule = ctx.plan().schedule();
        let mut store = ResultStore::with_capacity(schedule.len());

        for (depth, wave) in schedule.waves.iter().enumerate() {
            let outcomes: Vec<Result<ExecutionResult, RunError>> = if ctx.is_cancelled() {
                wave.iter()
                    .map(|_| {
                        Ok(ExecutionResult::err(
                            NodeErrorKind::Cancelled,
                            "run was cancelled before this node was evaluated",
                        ))
                    })
                    .collect()
            } else {
                log::debug!("wave {}: {} node(s)", depth, wave.len());
                let committed = &store;
                wave.par_iter()
                    .map(|id| ctx.evaluate(id, committed))
                    .collect()
            };

            for (id, outcome) in wave.iter().zip(outcomes) {
                store.insert(id.clone(), outcome?)?;
            }
        }

        Ok(store.into_report())
    }
}
