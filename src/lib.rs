//! # Keisan - Node Graph Execution Engine
//!
//! **Keisan** evaluates graphs of typed computation nodes, the kind a visual
//! node editor produces. Hosts register node types in a catalog, hand the
//! engine a graph, and get back one result per node.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Catalog**: Register node types with `NodeType::builder`, or
//!     start from `Catalog::standard()`.
//! 2.  **Describe a Graph**: Build a `Graph` in code, load the editor's JSON with
//!     `EditorGraph`, or implement `IntoGraph` for your own format.
//! 3.  **Validate and Plan**: The engine collects every structural problem
//!     (unknown types, missing inputs, dangling connections, cycles) before any
//!     node function runs, then orders the nodes deterministically.
//! 4.  **Execute**: Each node is evaluated once, after its dependencies. A
//!     failing node only affects the nodes downstream of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keisan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = Catalog::builder()
//!     .with(
//!         NodeType::builder("add")
//!             .description("Add two numbers")
//!             .param("a", ValueType::Number)
//!             .param_with_default("b", ValueType::Number, 1.0)
//!             .output(ValueType::Number)
//!             .implementation(|args| Ok(Value::Number(args.number("a")? + args.number("b")?))),
//!     )
//!     .build()?;
//!
//! let graph = Graph::new()
//!     .with_node(NodeInstance::new("n1", "add").literal("a", 2.0).literal("b", 3.0))
//!     .with_node(NodeInstance::new("n2", "add").connect("a", "n1"));
//!
//! let engine = Engine::new(catalog);
//! let report = engine.run(graph)?;
//! assert_eq!(report.value("n2"), Some(&Value::Number(6.0)));
//!
//! println!("{}", ReportFormatter::format_report(&report));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod executor;
pub mod graph;
pub mod plan;
pub mod prelude;
pub mod report;
pub mod scheduler;
pub mod strategy;
pub mod validate;
pub mod value;
