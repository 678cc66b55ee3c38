use crate::graph::DependencyIndex;
use ahash::AHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Finds cycles with a three-colour depth-first search over the dependency
/// direction (consumer → producer).
///
/// Roots and dependencies are visited in ascending id order, so the result is
/// deterministic. Every back edge reports the cycle it closes, rotated to start
/// at its smallest id. A node that only sits on a cycle through an already
/// finished node is not named; every cyclic graph still yields at least one
/// cycle. The search is iterative and terminates on any finite graph,
/// self-loops included.
pub(super) fn find_cycles(index: &DependencyIndex<'_>) -> Vec<Vec<String>> {
    let mut marks: AHashMap<&str, Mark> = index.ids().map(|id| (id, Mark::Unvisited)).collect();
    let mut cycles = Vec::new();

    for root in index.ids() {
        if marks.get(root) != Some(&Mark::Unvisited) {
            continue;
        }

        // Each frame holds a node and the dependencies still to explore.
        let mut path: Vec<&str> = vec![root];
        let mut pending: Vec<VecDeque<&str>> = vec![index.dependencies(root).collect()];
        marks.insert(root, Mark::InProgress);

        while let Some(frame) = pending.last_mut() {
            // Dependencies were collected ascending; consume from the front.
            let Some(next) = frame.pop_front() else {
                pending.pop();
                if let Some(done) = path.pop() {
                    marks.insert(done, Mark::Done);
                }
                continue;
            };
            match marks.get(next).copied().unwrap_or(Mark::Done) {
                Mark::Unvisited => {
                    marks.insert(next, Mark::InProgress);
                    path.push(next);
                    pending.push(index.dependencies(next).collect());
                }
                Mark::InProgress => {
                    if let Some(start) = path.iter().position(|id| *id == next) {
                        cycles.push(canonical_cycle(&path[start..]));
                    }
                }
                Mark::Done => {}
            }
        }
    }

    cycles
}

fn canonical_cycle(members: &[&str]) -> Vec<String> {
    let pivot = members
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map_or(0, |(i, _)| i);
    members[pivot..]
        .iter()
        .chain(&members[..pivot])
        .map(|id| id.to_string())
        .collect()
}
