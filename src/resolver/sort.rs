//! Topological sort using Kahn's algorithm
//!
//! Produces an install order in which every resource comes after all of the
//! resources it depends on.
//!
//! ## Algorithm
//!
//! 1. Count, for every node, how many of its dependencies are registered
//!    (edges to unregistered keys are ignored, those were reported as missing
//!    during traversal)
//! 2. Seed a FIFO queue with every node whose count is zero, in registration
//!    order
//! 3. Pop a node, emit it, and decrement the count of each node depending on
//!    it; dependents reaching zero join the back of the queue
//!
//! Whatever was never emitted sits on, or behind, a cycle.
//!
//! ## Example
//!
//! ```text
//! registered:  hook:a (deps: lib:b), lib:b (no deps)
//! in-degree:   hook:a = 1, lib:b = 0
//! queue:       [lib:b] → emit lib:b → hook:a drops to 0 → emit hook:a
//! order:       [lib:b, hook:a]
//! ```

use std::collections::VecDeque;

use super::graph::DependencyGraph;
use crate::resource::ResourceKey;

/// Result of sorting a dependency graph
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SortOutcome {
    /// Emitted keys, dependencies first
    pub order: Vec<ResourceKey>,
    /// Keys that could not be ordered, in registration order
    pub stuck: Vec<ResourceKey>,
}

/// Sort the graph into dependency-first order
pub(crate) fn topological_sort(graph: &DependencyGraph) -> SortOutcome {
    let nodes = graph.nodes();
    let mut in_degree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        for dep in &node.dependency_keys {
            if let Some(d) = graph.position(dep) {
                dependents[d].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut emitted = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(i) = queue.pop_front() {
        emitted[i] = true;
        order.push(nodes[i].key.clone());

        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    let stuck = nodes
        .iter()
        .zip(&emitted)
        .filter(|(_, done)| !**done)
        .map(|(node, _)| node.key.clone())
        .collect();

    SortOutcome { order, stuck }
}
