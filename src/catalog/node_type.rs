use crate::error::{ArgumentError, CatalogError};
use crate::value::{Value, ValueType};
use ahash::AHashSet;
use std::fmt;
use std::sync::Arc;

/// Error type node implementations return. Anything implementing
/// `std::error::Error` converts into it through `?`.
pub type NodeFault = Box<dyn std::error::Error + Send + Sync>;

/// The executable half of a node type.
pub type NodeFn = Arc<dyn Fn(&Args) -> Result<Value, NodeFault> + Send + Sync>;

/// The name of the single output every node type exposes.
pub const DEFAULT_OUTPUT: &str = "out";

/// A declared input of a node type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value_type: ValueType,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A named, typed operation available to graphs.
///
/// Built once through [`NodeType::builder`] and immutable afterwards.
#[derive(Clone)]
pub struct NodeType {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    output_type: ValueType,
    implementation: NodeFn,
}

impl NodeType {
    pub fn builder(name: impl Into<String>) -> NodeTypeBuilder {
        NodeTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn output_type(&self) -> ValueType {
        self.output_type
    }

    /// Name of the output slot connections may read from.
    pub fn output_name(&self) -> &str {
        DEFAULT_OUTPUT
    }

    /// Calls the implementation directly, outside the engine's fault boundary.
    pub fn call(&self, args: &Args) -> Result<Value, NodeFault> {
        (self.implementation)(args)
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("output_type", &self.output_type)
            .finish_non_exhaustive()
    }
}

/// Declares a [`NodeType`] step by step.
///
/// ```rust
/// use keisan::catalog::NodeType;
/// use keisan::value::{Value, ValueType};
///
/// let add = NodeType::builder("add")
///     .description("Add two numbers")
///     .param("a", ValueType::Number)
///     .param("b", ValueType::Number)
///     .output(ValueType::Number)
///     .implementation(|args| Ok(Value::Number(args.number("a")? + args.number("b")?)))
///     .build()
///     .unwrap();
/// assert_eq!(add.parameters().len(), 2);
/// ```
pub struct NodeTypeBuilder {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    output_type: ValueType,
    implementation: Option<NodeFn>,
}

impl NodeTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            output_type: ValueType::Any,
            implementation: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a required parameter.
    pub fn param(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value_type,
            default: None,
        });
        self
    }

    /// Adds a parameter used with `default` when the graph leaves it unset.
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        value_type: ValueType,
        default: impl Into<Value>,
    ) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value_type,
            default: Some(default.into()),
        });
        self
    }

    pub fn output(mut self, value_type: ValueType) -> Self {
        self.output_type = value_type;
        self
    }

    pub fn implementation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Args) -> Result<Value, NodeFault> + Send + Sync + 'static,
    {
        self.implementation = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<NodeType, CatalogError> {
        let mut seen = AHashSet::new();
        let mut parameters = Vec::with_capacity(self.parameters.len());
        for mut param in self.parameters {
            if !seen.insert(param.name.clone()) {
                return Err(CatalogError::DuplicateParameter {
                    type_name: self.name,
                    param: param.name,
                });
            }
            // Defaults are stored already converted to the declared type.
            if let Some(default) = param.default.take() {
                let coerced =
                    default
                        .coerce(param.value_type)
                        .map_err(|source| CatalogError::InvalidDefault {
                            type_name: self.name.clone(),
                            param: param.name.clone(),
                            source,
                        })?;
                param.default = Some(coerced);
            }
            parameters.push(param);
        }

        let implementation = self
            .implementation
            .ok_or_else(|| CatalogError::MissingImplementation(self.name.clone()))?;

        Ok(NodeType {
            name: self.name,
            description: self.description,
            parameters,
            output_type: self.output_type,
            implementation,
        })
    }
}

/// Resolved, type-coerced arguments handed to a node implementation, one per
/// declared parameter in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    entries: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&Value, ArgumentError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    /// Positional access, in declaration order.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn number(&self, name: &str) -> Result<f64, ArgumentError> {
        match self.typed(name, ValueType::Number)? {
            Value::Number(n) => Ok(n),
            other => Err(self.wrong_type(name, ValueType::Number, other)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, ArgumentError> {
        match self.typed(name, ValueType::Integer)? {
            Value::Number(n) => Ok(n as i64),
            other => Err(self.wrong_type(name, ValueType::Integer, other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ArgumentError> {
        match self.typed(name, ValueType::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(self.wrong_type(name, ValueType::Bool, other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<String, ArgumentError> {
        match self.typed(name, ValueType::Text)? {
            Value::Text(s) => Ok(s),
            other => Err(self.wrong_type(name, ValueType::Text, other)),
        }
    }

    pub fn list(&self, name: &str) -> Result<Vec<Value>, ArgumentError> {
        match self.typed(name, ValueType::List)? {
            Value::List(items) => Ok(items),
            other => Err(self.wrong_type(name, ValueType::List, other)),
        }
    }

    fn typed(&self, name: &str, value_type: ValueType) -> Result<Value, ArgumentError> {
        self.get(name)?
            .clone()
            .coerce(value_type)
            .map_err(|source| ArgumentError::WrongType {
                name: name.to_string(),
                source,
            })
    }

    fn wrong_type(&self, name: &str, expected: ValueType, found: Value) -> ArgumentError {
        ArgumentError::WrongType {
            name: name.to_string(),
            source: crate::error::CoercionError { expected, found },
        }
    }
}
