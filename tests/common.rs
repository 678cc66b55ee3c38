//! Common test utilities for building catalogs and graphs.
use keisan::catalog::NodeTypeBuilder;
use keisan::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// `add(a: number, b: number) -> number`.
#[allow(dead_code)]
pub fn add_type() -> NodeTypeBuilder {
    NodeType::builder("add")
        .description("Add two numbers")
        .param("a", ValueType::Number)
        .param("b", ValueType::Number)
        .output(ValueType::Number)
        .implementation(|args| Ok(Value::Number(args.number("a")? + args.number("b")?)))
}

/// A catalog holding only `add`.
#[allow(dead_code)]
pub fn create_add_catalog() -> Catalog {
    Catalog::builder().with(add_type()).build().unwrap()
}

/// The standard library plus node types that misbehave on purpose:
/// `fail` returns an error, `explode` panics, `sleep(ms)` blocks for `ms`
/// milliseconds before returning it.
#[allow(dead_code)]
pub fn create_probe_catalog() -> Catalog {
    Catalog::builder()
        .with_standard_types()
        .with(
            NodeType::builder("fail")
                .description("Always fails")
                .output(ValueType::Any)
                .implementation(|_| Err("deliberate failure".into())),
        )
        .with(
            NodeType::builder("explode")
                .description("Always panics")
                .output(ValueType::Any)
                .implementation(|_| panic!("kaboom")),
        )
        .with(
            NodeType::builder("sleep")
                .description("Blocks, then returns its input")
                .param("ms", ValueType::Integer)
                .output(ValueType::Integer)
                .implementation(|args| {
                    let ms = args.integer("ms")?;
                    thread::sleep(Duration::from_millis(ms as u64));
                    Ok(Value::from(ms))
                }),
        )
        .build()
        .unwrap()
}

/// `count(value: any = null)` passes its input through and bumps `calls`.
#[allow(dead_code)]
pub fn create_counting_catalog(calls: Arc<AtomicUsize>) -> Catalog {
    Catalog::builder()
        .with(
            NodeType::builder("count")
                .param_with_default("value", ValueType::Any, Value::Null)
                .output(ValueType::Any)
                .implementation(move |args| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(args.get("value")?.clone())
                }),
        )
        .build()
        .unwrap()
}

/// `trigger(value: number)` cancels `token` and returns its input.
#[allow(dead_code)]
pub fn create_cancelling_catalog(token: CancellationToken) -> Catalog {
    Catalog::builder()
        .with_standard_types()
        .with(
            NodeType::builder("trigger")
                .param("value", ValueType::Number)
                .output(ValueType::Number)
                .implementation(move |args| {
                    token.cancel();
                    Ok(Value::from(args.number("value")?))
                }),
        )
        .build()
        .unwrap()
}

/// `src = 4`, `left = src + 1`, `right = src * 2`, `join = left - right`.
#[allow(dead_code)]
pub fn create_diamond_graph() -> Graph {
    Graph::new()
        .with_node(NodeInstance::new("join", "subtract").connect("a", "left").connect("b", "right"))
        .with_node(NodeInstance::new("right", "multiply").connect("a", "src").literal("b", 2.0))
        .with_node(NodeInstance::new("left", "add").connect("a", "src").literal("b", 1.0))
        .with_node(NodeInstance::new("src", "constant").literal("value", 4.0))
}

/// The same diamond as the editor would send it.
#[allow(dead_code)]
pub fn create_diamond_editor_json() -> &'static str {
    r#"{
        "src":   {"type": "constant", "inputs": {"value": 4}},
        "left":  {"type": "add",      "inputs": {"a": {"node": "src"}, "b": 1}},
        "right": {"type": "multiply", "inputs": {"a": {"node": "src"}, "b": 2}},
        "join":  {"type": "subtract", "inputs": {"a": {"node": "left"}, "b": {"node": "right"}}}
    }"#
}

#[allow(dead_code)]
pub fn number(report: &ExecutionReport, id: &str) -> f64 {
    report
        .value(id)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("node '{}' has no numeric result: {:?}", id, report.get(id)))
}

#[allow(dead_code)]
pub fn error_kind(report: &ExecutionReport, id: &str) -> Option<NodeErrorKind> {
    report.get(id).and_then(ExecutionResult::error_kind)
}
