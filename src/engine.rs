use crate::catalog::Catalog;
use crate::error::RunError;
use crate::executor::{self, RunOptions};
use crate::graph::Graph;
use crate::plan::ExecutionPlan;
use crate::report::ExecutionReport;
use crate::scheduler;
use crate::validate::{ValidationReport, Validator};
use std::sync::Arc;

/// The entry point for hosts: validate, schedule and run graphs against one
/// catalog.
///
/// An engine is cheap to clone and holds no per-run state, so a single
/// instance can serve any number of concurrent runs.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
}

impl Engine {
    pub fn new(catalog: impl Into<Arc<Catalog>>) -> Self {
        Self {
            catalog: catalog.into(),
        }
    }

    /// An engine over [`Catalog::standard`].
    pub fn standard() -> Self {
        Self::new(Catalog::standard())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs every structural check without executing anything.
    pub fn validate(&self, graph: &Graph) -> ValidationReport {
        Validator::new(&self.catalog).validate(graph)
    }

    /// Validates and schedules `graph`. Structural errors are returned all at
    /// once as [`RunError::Invalid`].
    pub fn plan(&self, graph: Graph) -> Result<ExecutionPlan, RunError> {
        self.validate(&graph).into_result()?;
        let schedule = scheduler::schedule(&graph)?;
        Ok(ExecutionPlan::new(graph, schedule))
    }

    pub fn execute(
        &self,
        plan: &ExecutionPlan,
        options: &RunOptions,
    ) -> Result<ExecutionReport, RunError> {
        executor::execute(&self.catalog, plan, options)
    }

    /// Validates, schedules and runs `graph` sequentially.
    pub fn run(&self, graph: Graph) -> Result<ExecutionReport, RunError> {
        self.run_with(graph, &RunOptions::default())
    }

    pub fn run_with(
        &self,
        graph: Graph,
        options: &RunOptions,
    ) -> Result<ExecutionReport, RunError> {
        let plan = self.plan(graph)?;
        self.execute(&plan, options)
    }
}
