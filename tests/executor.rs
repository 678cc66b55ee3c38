//! Tests for the execution driver: failure isolation, coercion, timeouts,
//! cancellation and the parallel strategy.
mod common;
use common::*;
use keisan::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_upstream_failure_propagates() {
    let engine = Engine::new(create_probe_catalog());
    let graph = Graph::new()
        .with_node(NodeInstance::new("f", "fail"))
        .with_node(NodeInstance::new("n1", "add").connect("a", "f").literal("b", 1.0))
        .with_node(NodeInstance::new("n2", "add").connect("a", "n1").literal("b", 1.0))
        .with_node(NodeInstance::new("ok", "constant").literal("value", 7.0));

    let report = engine.run(graph).unwrap();
    assert_eq!(report.len(), 4);

    let f = report.get("f").unwrap().failure().unwrap();
    assert_eq!(f.kind, NodeErrorKind::EvaluationError);
    assert_eq!(f.message, "deliberate failure");

    let n1 = report.get("n1").unwrap().failure().unwrap();
    assert_eq!(n1.kind, NodeErrorKind::UpstreamFailure);
    assert_eq!(n1.message, "dependency f failed");

    let n2 = report.get("n2").unwrap().failure().unwrap();
    assert_eq!(n2.kind, NodeErrorKind::UpstreamFailure);
    assert_eq!(n2.message, "dependency n1 failed");

    assert_eq!(number(&report, "ok"), 7.0);
    assert_eq!(report.ok_count(), 1);
    assert_eq!(report.failed_count(), 3);
}

#[test]
fn test_panic_is_contained() {
    let engine = Engine::new(create_probe_catalog());
    let graph = Graph::new()
        .with_node(NodeInstance::new("boom", "explode"))
        .with_node(NodeInstance::new("fine", "add").literal("a", 1.0).literal("b", 1.0));

    let report = engine.run(graph).unwrap();
    let boom = report.get("boom").unwrap().failure().unwrap();
    assert_eq!(boom.kind, NodeErrorKind::EvaluationError);
    assert!(boom.message.contains("kaboom"));
    assert_eq!(number(&report, "fine"), 2.0);
}

#[test]
fn test_type_mismatch_on_unconvertible_text() {
    let engine = Engine::standard();
    let graph = Graph::new().with_node(
        NodeInstance::new("n1", "divide")
            .literal("a", "x")
            .literal("b", 2.0),
    );

    let report = engine.run(graph).unwrap();
    assert_eq!(report.len(), 1);
    let failure = report.get("n1").unwrap().failure().unwrap();
    assert_eq!(failure.kind, NodeErrorKind::TypeMismatch);
    assert_eq!(
        failure.message,
        "parameter 'a': expected number, but found text value 'x'"
    );
}

#[test]
fn test_type_mismatch_from_connected_value() {
    let engine = Engine::standard();
    let graph = Graph::new()
        .with_node(NodeInstance::new("label", "constant").literal("value", "hello"))
        .with_node(NodeInstance::new("n1", "negate").connect("value", "label"));

    let report = engine.run(graph).unwrap();
    assert!(report.get("label").unwrap().is_ok());
    assert_eq!(error_kind(&report, "n1"), Some(NodeErrorKind::TypeMismatch));
}

#[test]
fn test_lenient_coercion() {
    let engine = Engine::standard();
    let graph = Graph::new()
        .with_node(NodeInstance::new("div", "divide").literal("a", "9").literal("b", 3.0))
        .with_node(NodeInstance::new("flag", "add").literal("a", true).literal("b", 1.0))
        .with_node(NodeInstance::new("txt", "concat").literal("a", 1.5).literal("b", false));

    let report = engine.run(graph).unwrap();
    assert_eq!(number(&report, "div"), 3.0);
    assert_eq!(number(&report, "flag"), 2.0);
    assert_eq!(report.value("txt"), Some(&Value::from("1.5false")));
}

#[test]
fn test_defaults_fill_unset_parameters() {
    let engine = Engine::standard();
    let graph = Graph::new()
        .with_node(NodeInstance::new("sq", "power").literal("base", 3.0))
        .with_node(NodeInstance::new("r", "round").literal("value", 2.567))
        .with_node(NodeInstance::new("r2", "round").literal("value", 2.567).literal("digits", 2i64));

    let report = engine.run(graph).unwrap();
    assert_eq!(number(&report, "sq"), 9.0);
    assert_eq!(number(&report, "r"), 3.0);
    assert!((number(&report, "r2") - 2.57).abs() < 1e-9);
}

#[test]
fn test_divide_by_zero_yields_zero() {
    let engine = Engine::standard();
    let graph = Graph::new().with_node(
        NodeInstance::new("n1", "divide")
            .literal("a", 5.0)
            .literal("b", 0.0),
    );
    let report = engine.run(graph).unwrap();
    assert_eq!(number(&report, "n1"), 0.0);
}

#[test]
fn test_each_node_runs_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = Engine::new(create_counting_catalog(calls.clone()));
    let graph = Graph::new()
        .with_node(NodeInstance::new("c1", "count").literal("value", 1.0))
        .with_node(NodeInstance::new("c2", "count").connect("value", "c1"))
        .with_node(NodeInstance::new("c3", "count").connect("value", "c1"))
        .with_node(NodeInstance::new("c4", "count").connect("value", "c2"))
        .with_node(NodeInstance::new("c5", "count"));

    let report = engine.run(graph).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(report.len(), 5);
    assert_eq!(number(&report, "c4"), 1.0);
    assert_eq!(report.value("c5"), Some(&Value::Null));
}

#[test]
fn test_timeout_records_and_propagates() {
    let engine = Engine::new(create_probe_catalog());
    let graph = Graph::new()
        .with_node(NodeInstance::new("slow", "sleep").literal("ms", 1000i64))
        .with_node(NodeInstance::new("after", "add").connect("a", "slow").literal("b", 1.0))
        .with_node(NodeInstance::new("quick", "sleep").literal("ms", 0i64));
    let options = RunOptions::new().with_timeout(Duration::from_millis(50));

    let report = engine.run_with(graph, &options).unwrap();
    let slow = report.get("slow").unwrap().failure().unwrap();
    assert_eq!(slow.kind, NodeErrorKind::Timeout);
    assert_eq!(slow.message, "evaluation exceeded 50 ms");
    assert_eq!(error_kind(&report, "after"), Some(NodeErrorKind::UpstreamFailure));
    assert_eq!(number(&report, "quick"), 0.0);
}

#[test]
fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let engine = Engine::standard();
    let options = RunOptions::new().with_cancellation(token);

    let report = engine.run_with(create_diamond_graph(), &options).unwrap();
    assert_eq!(report.len(), 4);
    for (id, result) in report.iter() {
        assert_eq!(result.error_kind(), Some(NodeErrorKind::Cancelled), "node {}", id);
    }
}

#[test]
fn test_cancel_mid_run_keeps_committed_results() {
    let token = CancellationToken::new();
    let engine = Engine::new(create_cancelling_catalog(token.clone()));
    // Schedule: a1, b1 (cancels), c1, d1.
    let graph = Graph::new()
        .with_node(NodeInstance::new("a1", "constant").literal("value", 1.0))
        .with_node(NodeInstance::new("b1", "trigger").connect("value", "a1"))
        .with_node(NodeInstance::new("c1", "add").connect("a", "a1").literal("b", 1.0))
        .with_node(NodeInstance::new("d1", "add").connect("a", "b1").literal("b", 1.0));
    let options = RunOptions::new().with_cancellation(token.clone());

    let report = engine.run_with(graph, &options).unwrap();
    assert_eq!(report.order().collect::<Vec<_>>(), vec!["a1", "b1", "c1", "d1"]);
    assert_eq!(number(&report, "a1"), 1.0);
    assert_eq!(number(&report, "b1"), 1.0);
    assert_eq!(error_kind(&report, "c1"), Some(NodeErrorKind::Cancelled));
    assert_eq!(error_kind(&report, "d1"), Some(NodeErrorKind::Cancelled));
    assert!(token.is_cancelled());
}

#[test]
fn test_parallel_matches_sequential() {
    let engine = Engine::standard();
    let graph = create_diamond_graph()
        .with_node(NodeInstance::new("neg", "negate").connect("value", "join"))
        .with_node(NodeInstance::new("cmp", "greater_than").connect("a", "left").connect("b", "right"))
        .with_node(NodeInstance::new("txt", "to_text").connect("value", "cmp"))
        .with_node(NodeInstance::new("bad", "divide").literal("a", "x").literal("b", 1.0))
        .with_node(NodeInstance::new("after_bad", "abs").connect("value", "bad"));

    let sequential = engine.run(graph.clone()).unwrap();
    let parallel = engine.run_with(graph, &RunOptions::parallel()).unwrap();

    assert_eq!(parallel.len(), sequential.len());
    for (id, result) in sequential.iter() {
        assert_eq!(parallel.get(id), Some(result), "node {}", id);
    }
    assert_eq!(number(&parallel, "neg"), 3.0);
    assert_eq!(parallel.value("txt"), Some(&Value::from("false")));
    assert_eq!(error_kind(&parallel, "after_bad"), Some(NodeErrorKind::UpstreamFailure));
}

#[test]
fn test_parallel_commits_wave_by_wave() {
    let engine = Engine::standard();
    let report = engine
        .run_with(create_diamond_graph(), &RunOptions::parallel())
        .unwrap();
    assert_eq!(
        report.order().collect::<Vec<_>>(),
        vec!["src", "left", "right", "join"]
    );
}

#[test]
fn test_parallel_isolates_failures() {
    let engine = Engine::new(create_probe_catalog());
    let graph = Graph::new()
        .with_node(NodeInstance::new("boom", "explode"))
        .with_node(NodeInstance::new("f", "fail"))
        .with_node(NodeInstance::new("x", "add").connect("a", "boom").connect("b", "f"))
        .with_node(NodeInstance::new("y", "add").literal("a", 2.0).literal("b", 2.0));

    let report = engine.run_with(graph, &RunOptions::parallel()).unwrap();
    assert_eq!(error_kind(&report, "boom"), Some(NodeErrorKind::EvaluationError));
    assert_eq!(error_kind(&report, "f"), Some(NodeErrorKind::EvaluationError));
    let x = report.get("x").unwrap().failure().unwrap();
    assert_eq!(x.kind, NodeErrorKind::UpstreamFailure);
    assert_eq!(x.message, "dependency boom failed");
    assert_eq!(number(&report, "y"), 4.0);
}

#[test]
fn test_parallel_respects_cancellation() {
    let token = CancellationToken::new();
    token.cancel();
    let engine = Engine::standard();
    let options = RunOptions::parallel().with_cancellation(token);

    let report = engine.run_with(create_diamond_graph(), &options).unwrap();
    assert_eq!(report.len(), 4);
    assert_eq!(report.failed_count(), 4);
    assert_eq!(error_kind(&report, "join"), Some(NodeErrorKind::Cancelled));
}

#[test]
fn test_parallel_cancel_mid_run_keeps_earlier_waves() {
    let token = CancellationToken::new();
    let engine = Engine::new(create_cancelling_catalog(token.clone()));
    // Waves: [a1], [t1] (cancels), [d1], [e1].
    let graph = Graph::new()
        .with_node(NodeInstance::new("a1", "constant").literal("value", 2.0))
        .with_node(NodeInstance::new("t1", "trigger").connect("value", "a1"))
        .with_node(NodeInstance::new("d1", "add").connect("a", "t1").literal("b", 1.0))
        .with_node(NodeInstance::new("e1", "negate").connect("value", "d1"));
    let options = RunOptions::parallel().with_cancellation(token.clone());

    let report = engine.run_with(graph, &options).unwrap();
    assert_eq!(report.order().collect::<Vec<_>>(), vec!["a1", "t1", "d1", "e1"]);
    assert_eq!(number(&report, "a1"), 2.0);
    assert_eq!(number(&report, "t1"), 2.0);
    for id in ["d1", "e1"] {
        let failure = report.get(id).unwrap().failure().unwrap();
        assert_eq!(failure.kind, NodeErrorKind::Cancelled, "node {}", id);
        assert_eq!(failure.message, "run was cancelled before this node was evaluated");
    }
    assert_eq!(report.ok_count(), 2);
    assert!(token.is_cancelled());
}

#[test]
fn test_parallel_timeout() {
    let engine = Engine::new(create_probe_catalog());
    let graph = Graph::new()
        .with_node(NodeInstance::new("slow", "sleep").literal("ms", 1000i64))
        .with_node(NodeInstance::new("fast", "sleep").literal("ms", 1i64));
    let options = RunOptions::parallel().with_timeout(Duration::from_millis(50));

    let report = engine.run_with(graph, &options).unwrap();
    assert_eq!(error_kind(&report, "slow"), Some(NodeErrorKind::Timeout));
    assert_eq!(number(&report, "fast"), 1.0);
}
