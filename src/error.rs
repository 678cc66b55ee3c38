use crate::value::{Value, ValueType};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or querying a [`Catalog`](crate::catalog::Catalog).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Node type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Node type '{0}' is not registered")]
    UnknownType(String),

    #[error("Node type '{type_name}' declares parameter '{param}' more than once")]
    DuplicateParameter { type_name: String, param: String },

    #[error("Node type '{0}' was built without an implementation")]
    MissingImplementation(String),

    #[error("Default for parameter '{param}' of node type '{type_name}' is invalid: {source}")]
    InvalidDefault {
        type_name: String,
        param: String,
        source: CoercionError,
    },
}

/// A structural problem in a user-drawn graph, detected before anything runs.
///
/// The validator collects every one of these so the editor can highlight all
/// offending nodes at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownType { node_id: String, type_name: String },

    #[error("Node '{node_id}' is missing required input '{param}'")]
    MissingRequiredInput { node_id: String, param: String },

    #[error("Input '{param}' of node '{node_id}' is connected to node '{target_id}', which does not exist")]
    DanglingConnection {
        node_id: String,
        param: String,
        target_id: String,
    },

    #[error("Cycle detected between nodes: {}", .cycle.iter().join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    #[error("Node id '{node_id}' is used more than once")]
    DuplicateNodeId { node_id: String },

    #[error("Node '{node_id}' of type '{type_name}' has no parameter named '{param}'")]
    UnknownParameter {
        node_id: String,
        type_name: String,
        param: String,
    },

    #[error("Input '{param}' of node '{node_id}' reads output '{slot}' of node '{target_id}', which has no such output")]
    UnknownOutputSlot {
        node_id: String,
        param: String,
        target_id: String,
        slot: String,
    },
}

impl StructuralError {
    /// The node ids an editor should highlight for this error.
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            StructuralError::UnknownType { node_id, .. }
            | StructuralError::MissingRequiredInput { node_id, .. }
            | StructuralError::DuplicateNodeId { node_id }
            | StructuralError::UnknownParameter { node_id, .. }
            | StructuralError::DanglingConnection { node_id, .. } => vec![node_id.as_str()],
            StructuralError::UnknownOutputSlot {
                node_id, target_id, ..
            } => vec![node_id.as_str(), target_id.as_str()],
            StructuralError::CycleDetected { cycle } => cycle.iter().map(String::as_str).collect(),
        }
    }
}

/// Failure of a whole `run` call.
///
/// Per-node runtime failures never surface here; they are recorded in the
/// report as [`NodeFailure`]s.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Graph failed validation with {} error(s): {}", .0.len(), .0.iter().join("; "))]
    Invalid(Vec<StructuralError>),

    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl RunError {
    /// The structural errors, if this run was rejected during validation.
    pub fn structural_errors(&self) -> &[StructuralError] {
        match self {
            RunError::Invalid(errors) => errors,
            RunError::Internal(_) => &[],
        }
    }
}

/// Classification of a per-node runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeErrorKind {
    /// A dependency of this node failed, so it was not evaluated.
    UpstreamFailure,
    /// An input could not be converted to the declared parameter type.
    TypeMismatch,
    /// The node function returned an error or panicked.
    EvaluationError,
    /// The node function did not finish within the configured timeout.
    Timeout,
    /// The run was cancelled before this node was evaluated.
    Cancelled,
}

impl fmt::Display for NodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeErrorKind::UpstreamFailure => "UpstreamFailure",
            NodeErrorKind::TypeMismatch => "TypeMismatch",
            NodeErrorKind::EvaluationError => "EvaluationError",
            NodeErrorKind::Timeout => "Timeout",
            NodeErrorKind::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// The error half of a node's [`ExecutionResult`](crate::report::ExecutionResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct NodeFailure {
    pub kind: NodeErrorKind,
    pub message: String,
}

impl NodeFailure {
    pub fn new(kind: NodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A value that could not be converted to a declared type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, but found {} value '{found}'", .found.value_type())]
pub struct CoercionError {
    pub expected: ValueType,
    pub found: Value,
}

/// Errors raised by the typed accessors on [`Args`](crate::catalog::Args).
///
/// These convert into a node fault through `?`, so node implementations can
/// propagate them directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("Argument '{0}' was not supplied")]
    Missing(String),

    #[error("Argument '{name}': {source}")]
    WrongType { name: String, source: CoercionError },
}

/// Errors that can occur when converting a custom user format into a keisan `Graph`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read graph file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Input '{param}' of node '{node_id}' is malformed: {message}")]
    InvalidInput {
        node_id: String,
        param: String,
        message: String,
    },
}

/// Errors raised while encoding, decoding or storing an execution plan.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Artifact error: {0}")]
    Generic(String),
}
