//! Per-node results and the report returned to callers.

use crate::error::{NodeErrorKind, NodeFailure, RunError};
use crate::graph::NodeId;
use crate::value::{Value, ValueType};
use ahash::AHashMap;

mod formatter;

pub use formatter::ReportFormatter;

/// The outcome of evaluating one node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Ok {
        value: Value,
        resolved_type: ValueType,
    },
    Err(NodeFailure),
}

impl ExecutionResult {
    pub fn ok(value: Value) -> Self {
        let resolved_type = value.value_type();
        ExecutionResult::Ok {
            value,
            resolved_type,
        }
    }

    pub fn err(kind: NodeErrorKind, message: impl Into<String>) -> Self {
        ExecutionResult::Err(NodeFailure::new(kind, message))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ExecutionResult::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ExecutionResult::Ok { value, .. } => Some(value),
            ExecutionResult::Err(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&NodeFailure> {
        match self {
            ExecutionResult::Ok { .. } => None,
            ExecutionResult::Err(failure) => Some(failure),
        }
    }

    pub fn error_kind(&self) -> Option<NodeErrorKind> {
        self.failure().map(|f| f.kind)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ExecutionResult::Ok {
                value,
                resolved_type,
            } => serde_json::json!({
                "status": "ok",
                "value": value.to_json(),
                "type": resolved_type.to_string(),
            }),
            ExecutionResult::Err(failure) => serde_json::json!({
                "status": "error",
                "kind": failure.kind.to_string(),
                "message": failure.message,
            }),
        }
    }
}

/// Append-only accumulator written by the driver during a run.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Vec<(NodeId, ExecutionResult)>,
    index: AHashMap<NodeId, usize>,
}

impl ResultStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, id: NodeId, result: ExecutionResult) -> Result<(), RunError> {
        if self.index.contains_key(&id) {
            return Err(RunError::Internal(format!(
                "node '{}' was evaluated twice",
                id
            )));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, result));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ExecutionResult> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    pub fn into_report(self) -> ExecutionReport {
        ExecutionReport {
            entries: self.entries,
            index: self.index,
        }
    }
}

/// Results of a finished run: one entry per node, in the order nodes were
/// committed, with keyed lookup.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    entries: Vec<(NodeId, ExecutionResult)>,
    index: AHashMap<NodeId, usize>,
}

impl ExecutionReport {
    pub fn get(&self, id: &str) -> Option<&ExecutionResult> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    /// The value of `id`, if it evaluated successfully.
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.get(id).and_then(ExecutionResult::value)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in commit order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExecutionResult)> {
        self.entries.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Node ids in commit order.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn ok_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.ok_count()
    }

    /// `{"<id>": {"status": ...}}`, keyed by node id.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(id, r)| (id.clone(), r.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_rejects_second_write() {
        let mut store = ResultStore::default();
        store
            .insert("n1".to_string(), ExecutionResult::ok(Value::Number(1.0)))
            .unwrap();
        let second = store.insert("n1".to_string(), ExecutionResult::ok(Value::Number(2.0)));
        assert!(matches!(second, Err(RunError::Internal(_))));
        assert_eq!(store.get("n1").and_then(|r| r.value()), Some(&Value::Number(1.0)));
    }

    #[test]
    fn report_keeps_commit_order_and_counts() {
        let mut store = ResultStore::with_capacity(2);
        store
            .insert("b".to_string(), ExecutionResult::ok(Value::Bool(true)))
            .unwrap();
        store
            .insert(
                "a".to_string(),
                ExecutionResult::err(NodeErrorKind::Timeout, "too slow"),
            )
            .unwrap();
        let report = store.into_report();
        assert_eq!(report.order().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(report.ok_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.get("a").unwrap().error_kind(), Some(NodeErrorKind::Timeout));
    }

    #[test]
    fn json_shape() {
        let mut store = ResultStore::default();
        store
            .insert("n1".to_string(), ExecutionResult::ok(Value::Number(5.0)))
            .unwrap();
        let json = store.into_report().to_json();
        assert_eq!(
            json,
            serde_json::json!({"n1": {"status": "ok", "value": 5.0, "type": "number"}})
        );
    }
}
