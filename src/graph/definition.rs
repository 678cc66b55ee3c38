use crate::catalog::DEFAULT_OUTPUT;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NodeId = String;

/// The complete, canonical definition of a node graph, ready for validation.
/// This is the target structure for any custom format conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<NodeInstance>,
}

/// One placed occurrence of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    pub id: NodeId,
    pub node_type: String,
    /// Bindings keyed by parameter name. A parameter missing from the map is
    /// treated exactly like [`Binding::Unset`].
    pub inputs: BTreeMap<String, Binding>,
}

/// How a single parameter of a node instance receives its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Binding {
    Literal(Value),
    Connection(Connection),
    Unset,
}

/// A reference to another node's output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub node: NodeId,
    pub slot: String,
}

impl Connection {
    pub fn new(node: impl Into<NodeId>) -> Self {
        Self {
            node: node.into(),
            slot: DEFAULT_OUTPUT.to_string(),
        }
    }

    pub fn with_slot(node: impl Into<NodeId>, slot: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            slot: slot.into(),
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeInstance) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn add_node(&mut self, node: NodeInstance) {
        self.nodes.push(node);
    }

    /// First node carrying `id`.
    pub fn node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeInstance {
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn literal(mut self, param: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs
            .insert(param.into(), Binding::Literal(value.into()));
        self
    }

    pub fn connect(mut self, param: impl Into<String>, source: impl Into<NodeId>) -> Self {
        self.inputs
            .insert(param.into(), Binding::Connection(Connection::new(source)));
        self
    }

    pub fn connect_slot(
        mut self,
        param: impl Into<String>,
        source: impl Into<NodeId>,
        slot: impl Into<String>,
    ) -> Self {
        self.inputs.insert(
            param.into(),
            Binding::Connection(Connection::with_slot(source, slot)),
        );
        self
    }

    pub fn unset(mut self, param: impl Into<String>) -> Self {
        self.inputs.insert(param.into(), Binding::Unset);
        self
    }

    pub fn binding(&self, param: &str) -> &Binding {
        self.inputs.get(param).unwrap_or(&Binding::Unset)
    }

    /// Parameter name and connection for every connected input, in parameter order.
    pub fn connections(&self) -> impl Iterator<Item = (&str, &Connection)> {
        self.inputs.iter().filter_map(|(param, binding)| match binding {
            Binding::Connection(conn) => Some((param.as_str(), conn)),
            _ => None,
        })
    }
}
