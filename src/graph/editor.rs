use super::conversion::IntoGraph;
use super::definition::{Binding, Connection, Graph, NodeInstance};
use crate::catalog::DEFAULT_OUTPUT;
use crate::error::GraphConversionError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// A graph exactly as the browser editor sends it:
/// `{"<node id>": {"type": "...", "inputs": {"<param>": literal | {"node": "<id>"}}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorGraph {
    pub nodes: BTreeMap<String, EditorNode>,
}

/// Editor node data: its type name and raw input values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, serde_json::Value>,
}

impl EditorGraph {
    pub fn from_json(json: &str) -> Result<Self, GraphConversionError> {
        serde_json::from_str(json).map_err(|e| GraphConversionError::JsonParseError(e.to_string()))
    }

    /// Load an editor graph from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, GraphConversionError> {
        let content = fs::read_to_string(path).map_err(|e| GraphConversionError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}

impl IntoGraph for EditorGraph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        let mut graph = Graph::new();
        for (id, node) in self.nodes {
            let mut instance = NodeInstance::new(id.clone(), node.node_type);
            for (param, raw) in node.inputs {
                let binding = parse_binding(&id, &param, &raw)?;
                instance.inputs.insert(param, binding);
            }
            graph.add_node(instance);
        }
        Ok(graph)
    }
}

/// `null` leaves a parameter unset, `{"node": id, "port"?: slot}` connects it,
/// and any other non-object JSON is a literal.
fn parse_binding(
    node_id: &str,
    param: &str,
    raw: &serde_json::Value,
) -> Result<Binding, GraphConversionError> {
    let malformed = |message: String| GraphConversionError::InvalidInput {
        node_id: node_id.to_string(),
        param: param.to_string(),
        message,
    };

    match raw {
        serde_json::Value::Null => Ok(Binding::Unset),
        serde_json::Value::Object(map) => {
            let source = map
                .get("node")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| malformed("object inputs must name a source with \"node\"".to_string()))?;
            let slot = match map.get("port") {
                None | Some(serde_json::Value::Null) => DEFAULT_OUTPUT,
                Some(serde_json::Value::String(port)) => port.as_str(),
                Some(other) => return Err(malformed(format!("\"port\" must be a string, got {}", other))),
            };
            Ok(Binding::Connection(Connection::with_slot(source, slot)))
        }
        literal => Value::from_json(literal)
            .map(Binding::Literal)
            .ok_or_else(|| malformed("literal lists may not contain objects".to_string())),
    }
}
