//! Evaluation ordering.
//!
//! The order is produced with Kahn's algorithm; when several nodes become
//! ready at once the smallest id goes first, so identical graphs always run in
//! the same order.

use crate::error::RunError;
use crate::graph::{DependencyIndex, Graph, NodeId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A complete evaluation order for one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Every node exactly once, each after all of its dependencies.
    pub order: Vec<NodeId>,
    /// Nodes grouped by dependency depth. Nodes within a wave are independent
    /// of one another and sorted ascending.
    pub waves: Vec<Vec<NodeId>>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `id` in the sequential order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|n| n == id)
    }
}

/// Orders a graph that already passed validation.
///
/// An incomplete order means the graph was not acyclic after all; that is an
/// internal error, never a user-facing one.
pub fn schedule(graph: &Graph) -> Result<Schedule, RunError> {
    let index = DependencyIndex::build(graph);

    let mut in_degree: AHashMap<&str, usize> =
        index.ids().map(|id| (id, index.in_degree(id))).collect();
    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut order = Vec::with_capacity(index.len());
    while let Some(id) = ready.pop_first() {
        order.push(id);
        for dependent in index.dependents(id) {
            if let Some(d) = in_degree.get_mut(dependent) {
                *d -= 1;
                if *d == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() != index.len() {
        return Err(RunError::Internal(format!(
            "schedule covers {} of {} nodes; the graph is not acyclic",
            order.len(),
            index.len()
        )));
    }

    let waves = build_waves(&index, &order);
    log::debug!(
        "scheduled {} nodes in {} wave(s)",
        order.len(),
        waves.len()
    );

    Ok(Schedule {
        order: order.into_iter().map(str::to_string).collect(),
        waves,
    })
}

/// Depth of a node is one more than its deepest dependency; roots sit at 0.
fn build_waves(index: &DependencyIndex<'_>, order: &[&str]) -> Vec<Vec<NodeId>> {
    let mut depth: AHashMap<&str, usize> = AHashMap::with_capacity(order.len());
    let mut waves: Vec<BTreeSet<&str>> = Vec::new();

    for &id in order {
        let level = index
            .dependencies(id)
            .filter_map(|dep| depth.get(dep))
            .map(|d| d + 1)
            .max()
            .unwrap_or(0);
        depth.insert(id, level);
        if waves.len() <= level {
            waves.resize_with(level + 1, BTreeSet::new);
        }
        waves[level].insert(id);
    }

    waves
        .into_iter()
        .map(|wave| wave.into_iter().map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeInstance;

    fn diamond() -> Graph {
        Graph::new()
            .with_node(NodeInstance::new("d", "add").connect("a", "b").connect("b", "c"))
            .with_node(NodeInstance::new("c", "add").connect("a", "a"))
            .with_node(NodeInstance::new("b", "add").connect("a", "a"))
            .with_node(NodeInstance::new("a", "constant"))
    }

    #[test]
    fn orders_dependencies_first() {
        let schedule = schedule(&diamond()).unwrap();
        assert_eq!(schedule.order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let graph = Graph::new()
            .with_node(NodeInstance::new("z", "constant"))
            .with_node(NodeInstance::new("m", "constant"))
            .with_node(NodeInstance::new("b", "constant").connect("value", "z"));
        let schedule = schedule(&graph).unwrap();
        assert_eq!(schedule.order, vec!["m", "z", "b"]);
    }

    #[test]
    fn waves_group_by_depth() {
        let schedule = schedule(&diamond()).unwrap();
        assert_eq!(
            schedule.waves,
            vec![vec!["a".to_string()], vec!["b".to_string(), "c".to_string()], vec!["d".to_string()]]
        );
    }

    #[test]
    fn repeated_producer_counts_once() {
        let graph = Graph::new()
            .with_node(NodeInstance::new("a", "constant"))
            .with_node(NodeInstance::new("b", "add").connect("a", "a").connect("b", "a"));
        let schedule = schedule(&graph).unwrap();
        assert_eq!(schedule.order, vec!["a", "b"]);
    }

    #[test]
    fn cycle_is_an_internal_error() {
        let graph = Graph::new()
            .with_node(NodeInstance::new("n1", "add").connect("b", "n2"))
            .with_node(NodeInstance::new("n2", "add").connect("b", "n1"));
        assert!(matches!(schedule(&graph), Err(RunError::Internal(_))));
    }
}
