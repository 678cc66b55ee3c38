//! Structural validation of user-drawn graphs.
//!
//! Every check runs and errors accumulate, so an editor can highlight all
//! problems at once instead of fixing them one run at a time.

use crate::catalog::Catalog;
use crate::error::{RunError, StructuralError};
use crate::graph::{Binding, DependencyIndex, Graph};
use ahash::AHashSet;

mod cycle;

/// The outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<StructuralError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), RunError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RunError::Invalid(self.errors))
        }
    }
}

/// Checks a [`Graph`] against a [`Catalog`].
pub struct Validator<'c> {
    catalog: &'c Catalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Runs every check in order: duplicate ids, node types, parameter
    /// bindings, connection targets, then cycles.
    pub fn validate(&self, graph: &Graph) -> ValidationReport {
        let index = DependencyIndex::build(graph);
        let mut errors = Vec::new();
        self.check_duplicate_ids(graph, &mut errors);
        self.check_node_types(graph, &mut errors);
        self.check_bindings(graph, &mut errors);
        self.check_connections(graph, &index, &mut errors);
        self.check_cycles(&index, &mut errors);

        if !errors.is_empty() {
            log::warn!(
                "graph with {} nodes failed validation with {} error(s)",
                graph.len(),
                errors.len()
            );
        }
        ValidationReport { errors }
    }

    fn check_duplicate_ids(&self, graph: &Graph, errors: &mut Vec<StructuralError>) {
        let mut seen = AHashSet::new();
        let mut reported = AHashSet::new();
        for node in &graph.nodes {
            if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
                errors.push(StructuralError::DuplicateNodeId {
                    node_id: node.id.clone(),
                });
            }
        }
    }

    fn check_node_types(&self, graph: &Graph, errors: &mut Vec<StructuralError>) {
        for node in &graph.nodes {
            if !self.catalog.contains(&node.node_type) {
                errors.push(StructuralError::UnknownType {
                    node_id: node.id.clone(),
                    type_name: node.node_type.clone(),
                });
            }
        }
    }

    /// Unknown parameter names, and unset parameters that have no default.
    /// Nodes of unknown type are skipped; they are already reported.
    fn check_bindings(&self, graph: &Graph, errors: &mut Vec<StructuralError>) {
        for node in &graph.nodes {
            let Some(node_type) = self.catalog.get(&node.node_type) else {
                continue;
            };

            for param in node.inputs.keys() {
                if node_type.parameter(param).is_none() {
                    errors.push(StructuralError::UnknownParameter {
                        node_id: node.id.clone(),
                        type_name: node_type.name().to_string(),
                        param: param.clone(),
                    });
                }
            }

            for param in node_type.parameters() {
                if matches!(node.binding(&param.name), Binding::Unset) && !param.has_default() {
                    errors.push(StructuralError::MissingRequiredInput {
                        node_id: node.id.clone(),
                        param: param.name.clone(),
                    });
                }
            }
        }
    }

    /// Connection targets must exist and expose the requested output slot.
    fn check_connections(
        &self,
        graph: &Graph,
        index: &DependencyIndex<'_>,
        errors: &mut Vec<StructuralError>,
    ) {
        for node in &graph.nodes {
            for (param, conn) in node.connections() {
                let Some(target) = index.node(&conn.node) else {
                    errors.push(StructuralError::DanglingConnection {
                        node_id: node.id.clone(),
                        param: param.to_string(),
                        target_id: conn.node.clone(),
                    });
                    continue;
                };
                // Slots of unknown types cannot be checked.
                if let Some(target_type) = self.catalog.get(&target.node_type) {
                    if conn.slot != target_type.output_name() {
                        errors.push(StructuralError::UnknownOutputSlot {
                            node_id: node.id.clone(),
                            param: param.to_string(),
                            target_id: conn.node.clone(),
                            slot: conn.slot.clone(),
                        });
                    }
                }
            }
        }
    }

    fn check_cycles(&self, index: &DependencyIndex<'_>, errors: &mut Vec<StructuralError>) {
        for cycle in cycle::find_cycles(index) {
            errors.push(StructuralError::CycleDetected { cycle });
        }
    }
}
