//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the keisan crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use keisan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = EditorGraph::from_file("path/to/graph.json")?.into_graph()?;
//!
//! let engine = Engine::new(Catalog::standard());
//! let report = engine.run_with(graph, &RunOptions::parallel())?;
//!
//! println!("{}", ReportFormatter::format_report(&report));
//! # Ok(())
//! # }
//! ```

// Engine and execution
pub use crate::engine::Engine;
pub use crate::executor::{CancellationToken, RunOptions};
pub use crate::plan::ExecutionPlan;
pub use crate::strategy::StrategyChoice;

// Catalog
pub use crate::catalog::{Args, Catalog, NodeType, Palette};

// Graph model and conversion
pub use crate::graph::{Binding, Connection, EditorGraph, Graph, IntoGraph, NodeInstance};
pub use crate::value::{Value, ValueType};

// Results
pub use crate::report::{ExecutionReport, ExecutionResult, ReportFormatter};

// Error types
pub use crate::error::{
    CatalogError, GraphConversionError, NodeErrorKind, NodeFailure, RunError, StructuralError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
