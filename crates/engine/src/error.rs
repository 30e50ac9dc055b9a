//! Engine-level error types.
//!
//! These are caller-misuse failures: an inconsistent graph snapshot, an
//! editor operation naming a node that isn't there, or a graph beyond the
//! simulator's limits. Structural workflow defects are never errors; they
//! are reported as [`Violation`](crate::Violation)s inside a result.

use thiserror::Error;

use crate::models::NodeKind;

/// Errors produced by the graph model and the simulator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ------ Snapshot consistency ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// An edge references a node ID that doesn't exist in the graph.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference {
        node_id: String,
        side: &'static str,
    },

    // ------ Editor operations ------

    /// No node with this ID exists.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// Replacement data belongs to a different node kind.
    #[error("node '{node_id}' is a {expected} node, got {found} data")]
    KindMismatch {
        node_id: String,
        expected: NodeKind,
        found: NodeKind,
    },

    // ------ Simulation ------

    /// The graph exceeds the configured node limit.
    #[error("graph has {nodes} nodes, limit is {limit}")]
    GraphTooLarge {
        nodes: usize,
        limit: usize,
    },
}
