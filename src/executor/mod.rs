//! The execution driver.
//!
//! A run walks a validated [`ExecutionPlan`], resolves each node's bindings
//! against the results committed so far and calls the node function inside a
//! fault boundary. Runtime failures stay local to the failing node and the
//! nodes that depend on it; the run as a whole only fails when the plan itself
//! is inconsistent.

use crate::catalog::Catalog;
use crate::error::RunError;
use crate::plan::ExecutionPlan;
use crate::report::ExecutionReport;

mod context;
mod invoke;
mod options;
mod parallel;
mod sequential;

pub use context::RunContext;
pub use options::{CancellationToken, RunOptions};
pub use parallel::ParallelStrategy;
pub use sequential::SequentialStrategy;

/// Runs every node of `plan` with the strategy chosen in `options`.
pub fn execute(
    catalog: &Catalog,
    plan: &ExecutionPlan,
    options: &RunOptions,
) -> Result<ExecutionReport, RunError> {
    let strategy = options.strategy.strategy();
    log::info!(
        "executing {} node(s) with the {} strategy",
        plan.len(),
        strategy.name()
    );

    let ctx = RunContext::new(catalog, plan, options);
    let report = strategy.execute(&ctx)?;

    log::info!(
        "run finished: {} ok, {} failed",
        report.ok_count(),
        report.failed_count()
    );
    Ok(report)
}
