use super::{Graph, NodeInstance};
use std::collections::{BTreeMap, BTreeSet};

/// Index-based adjacency for a graph: node id → distinct producer ids.
///
/// Only edges whose producer exists are indexed; dangling connections are the
/// validator's concern. When an id is duplicated, the first node wins.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex<'g> {
    nodes: BTreeMap<&'g str, &'g NodeInstance>,
    dependencies: BTreeMap<&'g str, BTreeSet<&'g str>>,
    dependents: BTreeMap<&'g str, BTreeSet<&'g str>>,
}

impl<'g> DependencyIndex<'g> {
    pub fn build(graph: &'g Graph) -> Self {
        let mut nodes = BTreeMap::new();
        for node in &graph.nodes {
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut dependencies: BTreeMap<&'g str, BTreeSet<&'g str>> = BTreeMap::new();
        let mut dependents: BTreeMap<&'g str, BTreeSet<&'g str>> = BTreeMap::new();
        for (&id, node) in &nodes {
            let deps = dependencies.entry(id).or_default();
            dependents.entry(id).or_default();
            for (_, conn) in node.connections() {
                if let Some((&source, _)) = nodes.get_key_value(conn.node.as_str()) {
                    deps.insert(source);
                }
            }
        }
        for (&id, deps) in &dependencies {
            for &dep in deps {
                dependents.entry(dep).or_default().insert(id);
            }
        }

        Self {
            nodes,
            dependencies,
            dependents,
        }
    }

    /// Node ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: &str) -> Option<&'g NodeInstance> {
        self.nodes.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct producers `id` depends on, ascending.
    pub fn dependencies(&self, id: &str) -> impl Iterator<Item = &'g str> + '_ {
        self.dependencies
            .get(id)
            .into_iter()
            .flat_map(|deps| deps.iter().copied())
    }

    /// Distinct consumers of `id`, ascending.
    pub fn dependents(&self, id: &str) -> impl Iterator<Item = &'g str> + '_ {
        self.dependents
            .get(id)
            .into_iter()
            .flat_map(|deps| deps.iter().copied())
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.dependencies.get(id).map_or(0, BTreeSet::len)
    }
}
