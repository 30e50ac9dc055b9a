//! Structural validation — run this before simulating a workflow.
//!
//! Rules enforced, in this order:
//! 1. At least one `start` node exists.
//! 2. The directed graph is acyclic. Every node is probed, so a cycle in a
//!    component unreachable from `start` is still found.
//!
//! End-node presence is checked by the simulator after traversal, not here.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Graph, NodeKind};

/// A structural defect, reported to the user as a human-readable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    #[serde(rename = "Missing start node")]
    MissingStartNode,
    #[serde(rename = "Cycle detected")]
    CycleDetected,
    #[serde(rename = "No start node")]
    NoStartNode,
    #[serde(rename = "No end node")]
    NoEndNode,
}

impl Violation {
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::MissingStartNode => "Missing start node",
            Violation::CycleDetected => "Cycle detected",
            Violation::NoStartNode => "No start node",
            Violation::NoEndNode => "No end node",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check the graph's structure and return every violation found.
///
/// An empty list means the graph passed both checks. At most one
/// [`Violation::CycleDetected`] is reported however many cycles exist.
pub fn validate(graph: &Graph) -> Vec<Violation> {
    let mut violations = Vec::new();

    if graph.find_by_kind(NodeKind::Start).is_empty() {
        violations.push(Violation::MissingStartNode);
    }

    let adjacency = graph.adjacency();
    if let Some(node) = graph
        .nodes()
        .iter()
        .find(|node| has_cycle_from(&adjacency, node.id.as_str()))
    {
        debug!("cycle reachable from node '{}'", node.id);
        violations.push(Violation::CycleDetected);
    }

    violations
}

/// Depth-first probe from `root` with its own visited and recursion-stack
/// sets. Reaching a node that is still on the recursion stack is a cycle;
/// reaching one that was already fully explored is a merge.
fn has_cycle_from(adjacency: &HashMap<&str, Vec<&str>>, root: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    // (node, index of the next child to explore)
    let mut stack: Vec<(&str, usize)> = Vec::new();

    visited.insert(root);
    on_stack.insert(root);
    stack.push((root, 0));

    while let Some(frame) = stack.last_mut() {
        let (node, next) = *frame;
        let child = adjacency
            .get(node)
            .and_then(|children| children.get(next))
            .copied();

        match child {
            Some(child) => {
                frame.1 += 1;
                if on_stack.contains(child) {
                    return true;
                }
                if visited.insert(child) {
                    on_stack.insert(child);
                    stack.push((child, 0));
                }
            }
            None => {
                on_stack.remove(node);
                stack.pop();
            }
        }
    }

    false
}
