use super::invoke::invoke;
use super::options::RunOptions;
use crate::catalog::{Args, Catalog, NodeType};
use crate::error::{NodeErrorKind, RunError};
use crate::graph::{Binding, NodeInstance};
use crate::plan::ExecutionPlan;
use crate::report::{ExecutionResult, ResultStore};
use ahash::AHashMap;
use std::sync::Arc;

/// Everything a strategy needs to evaluate the nodes of one plan.
pub struct RunContext<'a> {
    catalog: &'a Catalog,
    plan: &'a ExecutionPlan,
    options: &'a RunOptions,
    nodes: AHashMap<&'a str, &'a NodeInstance>,
}

impl<'a> RunContext<'a> {
    pub fn new(catalog: &'a Catalog, plan: &'a ExecutionPlan, options: &'a RunOptions) -> Self {
        let mut nodes = AHashMap::with_capacity(plan.len());
        for node in &plan.graph().nodes {
            nodes.entry(node.id.as_str()).or_insert(node);
        }
        Self {
            catalog,
            plan,
            options,
            nodes,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn plan(&self) -> &ExecutionPlan {
        self.plan
    }

    pub fn options(&self) -> &RunOptions {
        self.options
    }

    pub fn is_cancelled(&self) -> bool {
        self.options.is_cancelled()
    }

    /// Resolves, coerces and invokes one node against the results committed
    /// so far. Every dependency of `id` must already be in `results`.
    ///
    /// Runtime failures come back as an `Err` [`ExecutionResult`]; the outer
    /// `Err` is reserved for broken plans.
    pub fn evaluate(&self, id: &str, results: &ResultStore) -> Result<ExecutionResult, RunError> {
        let node = self.nodes.get(id).copied().ok_or_else(|| {
            RunError::Internal(format!("scheduled node '{}' is not part of the graph", id))
        })?;

        let result = self.evaluate_node(node, results)?;
        match &result {
            ExecutionResult::Ok { resolved_type, .. } => {
                log::debug!("node '{}' ({}) -> {}", id, node.node_type, resolved_type)
            }
            ExecutionResult::Err(failure) => {
                log::warn!("node '{}' ({}) failed: {}", id, node.node_type, failure)
            }
        }
        Ok(result)
    }

    fn evaluate_node(
        &self,
        node: &NodeInstance,
        results: &ResultStore,
    ) -> Result<ExecutionResult, RunError> {
        if self.is_cancelled() {
            return Ok(ExecutionResult::err(
                NodeErrorKind::Cancelled,
                "run was cancelled before this node was evaluated",
            ));
        }

        let Some(node_type) = self.catalog.get_shared(&node.node_type) else {
            return Ok(ExecutionResult::err(
                NodeErrorKind::EvaluationError,
                format!("node type '{}' is not registered", node.node_type),
            ));
        };

        if let Some(blocked) = self.check_dependencies(node, results)? {
            return Ok(blocked);
        }

        match self.resolve_args(node, &node_type, results) {
            Ok(args) => Ok(invoke(&node_type, args, self.options.timeout)),
            Err(failure) => Ok(failure),
        }
    }

    /// A cancelled dependency outranks a failed one.
    fn check_dependencies(
        &self,
        node: &NodeInstance,
        results: &ResultStore,
    ) -> Result<Option<ExecutionResult>, RunError> {
        let mut failed = None;
        for (_, conn) in node.connections() {
            if !self.nodes.contains_key(conn.node.as_str()) {
                return Ok(Some(ExecutionResult::err(
                    NodeErrorKind::EvaluationError,
                    format!("connected node '{}' does not exist", conn.node),
                )));
            }
            let upstream = results.get(&conn.node).ok_or_else(|| {
                RunError::Internal(format!(
                    "node '{}' was scheduled before its dependency '{}'",
                    node.id, conn.node
                ))
            })?;
            match upstream.error_kind() {
                Some(NodeErrorKind::Cancelled) => {
                    return Ok(Some(ExecutionResult::err(
                        NodeErrorKind::Cancelled,
                        format!("dependency {} was cancelled", conn.node),
                    )));
                }
                Some(_) if failed.is_none() => failed = Some(conn.node.as_str()),
                _ => {}
            }
        }

        Ok(failed.map(|dep| {
            ExecutionResult::err(
                NodeErrorKind::UpstreamFailure,
                format!("dependency {} failed", dep),
            )
        }))
    }

    /// Builds the argument list in declaration order, every value coerced to
    /// its declared type.
    fn resolve_args(
        &self,
        node: &NodeInstance,
        node_type: &Arc<NodeType>,
        results: &ResultStore,
    ) -> Result<Args, ExecutionResult> {
        let mut args = Args::new();
        for param in node_type.parameters() {
            let raw = match node.binding(&param.name) {
                Binding::Literal(value) => value.clone(),
                Binding::Connection(conn) => results
                    .get(&conn.node)
                    .and_then(ExecutionResult::value)
                    .cloned()
                    .ok_or_else(|| {
                        ExecutionResult::err(
                            NodeErrorKind::UpstreamFailure,
                            format!("dependency {} failed", conn.node),
                        )
                    })?,
                Binding::Unset => param.default.clone().ok_or_else(|| {
                    ExecutionResult::err(
                        NodeErrorKind::EvaluationError,
                        format!("parameter '{}' is unset and has no default", param.name),
                    )
                })?,
            };

            let value = raw.coerce(param.value_type).map_err(|e| {
                ExecutionResult::err(
                    NodeErrorKind::TypeMismatch,
                    format!("parameter '{}': {}", param.name, e),
                )
            })?;
            args.push(param.name.clone(), value);
        }
        Ok(args)
    }
}
