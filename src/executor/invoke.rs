use crate::catalog::{Args, NodeType};
use crate::error::NodeErrorKind;
use crate::report::ExecutionResult;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Calls a node function inside the fault boundary, optionally bounded by a
/// deadline.
pub(super) fn invoke(
    node_type: &Arc<NodeType>,
    args: Args,
    timeout: Option<Duration>,
) -> ExecutionResult {
    match timeout {
        None => guarded_call(node_type, &args),
        Some(limit) => call_with_deadline(Arc::clone(node_type), args, limit),
    }
}

fn guarded_call(node_type: &NodeType, args: &Args) -> ExecutionResult {
    match panic::catch_unwind(AssertUnwindSafe(|| node_type.call(args))) {
        Ok(Ok(value)) => ExecutionResult::ok(value),
        Ok(Err(fault)) => ExecutionResult::err(NodeErrorKind::EvaluationError, fault.to_string()),
        Err(payload) => {
            log::error!("node type '{}' panicked", node_type.name());
            ExecutionResult::err(
                NodeErrorKind::EvaluationError,
                format!("node panicked: {}", panic_message(payload.as_ref())),
            )
        }
    }
}

// A call that misses the deadline keeps running on its detached thread; its
// late result is dropped with the channel.
fn call_with_deadline(node_type: Arc<NodeType>, args: Args, limit: Duration) -> ExecutionResult {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name(format!("keisan-{}", node_type.name()))
        .spawn(move || {
            let _ = tx.send(guarded_call(&node_type, &args));
        });
    if let Err(e) = spawned {
        return ExecutionResult::err(
            NodeErrorKind::EvaluationError,
            format!("could not start evaluation thread: {}", e),
        );
    }

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => ExecutionResult::err(
            NodeErrorKind::Timeout,
            format!("evaluation exceeded {} ms", limit.as_millis()),
        ),
        Err(mpsc::RecvTimeoutError::Disconnected) => ExecutionResult::err(
            NodeErrorKind::EvaluationError,
            "evaluation thread exited without a result",
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
