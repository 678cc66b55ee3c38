use super::definition::Graph;
use crate::error::GraphConversionError;

/// A trait for custom data models that can be converted into a keisan `Graph`.
///
/// This is the extension point that keeps the engine format-agnostic: any
/// editor or storage format provides a translation into the canonical model,
/// and validation takes it from there.
///
/// # Example
///
/// ```rust,no_run
/// use keisan::prelude::*;
/// use keisan::error::GraphConversionError;
///
/// // 1. Your own format, e.g. a flat list of "a + b" steps.
/// struct Step { id: String, lhs: f64, rhs: f64 }
/// struct Sheet { steps: Vec<Step> }
///
/// // 2. Translate it.
/// impl IntoGraph for Sheet {
///     fn into_graph(self) -> std::result::Result<Graph, GraphConversionError> {
///         let mut graph = Graph::new();
///         for step in self.steps {
///             graph.add_node(
///                 NodeInstance::new(step.id, "add")
///                     .literal("a", step.lhs)
///                     .literal("b", step.rhs),
///             );
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a keisan graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}

impl IntoGraph for Graph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        Ok(self)
    }
}
