use crate::error::CoercionError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime values flowing between nodes.
///
/// The serde derive is the externally tagged default (`{"Number": 1.0}`) and
/// is what the bincode plan format stores. Plain JSON, as the editor and the
/// report use it, goes through [`Value::from_json`] and [`Value::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

/// The type vocabulary used by parameter and output declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Any,
    Number,
    /// A number without fractional part.
    Integer,
    Bool,
    Text,
    List,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Any => "any",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Bool => "bool",
            ValueType::Text => "text",
            ValueType::List => "list",
        };
        f.write_str(name)
    }
}

impl Value {
    /// The runtime type of this value. `Null` reports as `Any`.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Any,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::Text(_) => ValueType::Text,
            Value::List(_) => ValueType::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts editor JSON into a value. Objects have no value representation
    /// and yield `None`, as does any list containing one.
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            // Non-finite numbers have no JSON form.
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
        }
    }

    /// Converts this value to the declared type, following the editor's lenient
    /// rules: numeric text becomes a number, numbers become booleans by
    /// non-zero test, scalars render to text.
    pub fn coerce(self, declared: ValueType) -> Result<Value, CoercionError> {
        let mismatch = |found: Value| CoercionError {
            expected: declared,
            found,
        };

        match (declared, self) {
            (ValueType::Any, v) => Ok(v),

            (ValueType::Number, Value::Number(n)) => Ok(Value::Number(n)),
            (ValueType::Number, Value::Bool(b)) => Ok(Value::Number(if b { 1.0 } else { 0.0 })),
            // "NaN" and "inf" parse as f64 but are not numeric text.
            (ValueType::Number, Value::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(mismatch(Value::Text(s))),
            },

            (ValueType::Integer, v) => match v.coerce(ValueType::Number) {
                Ok(Value::Number(n)) if n.is_finite() && n.fract() == 0.0 => Ok(Value::Number(n)),
                Ok(other) => Err(mismatch(other)),
                Err(err) => Err(mismatch(err.found)),
            },

            (ValueType::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (ValueType::Bool, Value::Number(n)) => Ok(Value::Bool(n != 0.0)),
            (ValueType::Bool, Value::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch(Value::Text(s))),
            },

            (ValueType::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (ValueType::Text, v @ (Value::Number(_) | Value::Bool(_))) => {
                Ok(Value::Text(v.to_string()))
            }

            (ValueType::List, Value::List(items)) => Ok(Value::List(items)),

            (_, found) => Err(mismatch(found)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
