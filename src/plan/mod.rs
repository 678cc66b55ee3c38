//! Validated, scheduled graphs ready to run.

use crate::graph::{Graph, NodeId};
use crate::scheduler::Schedule;
use serde::{Deserialize, Serialize};

mod artifact;

/// A graph that passed validation, together with its evaluation order.
///
/// Produced by [`Engine::plan`](crate::engine::Engine::plan). A plan can be
/// stored with [`save`](Self::save) and run again later without repeating
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    graph: Graph,
    schedule: Schedule,
}

impl ExecutionPlan {
    pub(crate) fn new(graph: Graph, schedule: Schedule) -> Self {
        Self { graph, schedule }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Node ids in sequential evaluation order.
    pub fn order(&self) -> &[NodeId] {
        &self.schedule.order
    }

    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }
}
