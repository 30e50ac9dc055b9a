//! Core domain models for the workflow engine.
//!
//! These types are the source of truth for what a workflow looks like in
//! memory. They serialise to and from the JSON shape the editor exchanges
//! (`{ "nodes": [...], "edges": [...] }`, camelCase fields, node kind in
//! `type`).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The kind of step a node represents. Fixed for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Task,
    Approval,
    Automated,
    End,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Task,
        NodeKind::Approval,
        NodeKind::Automated,
        NodeKind::End,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Task => "task",
            NodeKind::Approval => "approval",
            NodeKind::Automated => "automated",
            NodeKind::End => "end",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Kind-specific fields of a node.
///
/// Each variant carries exactly the fields valid for its kind. Fields the
/// editor marks as required default to empty on input so that half-filled
/// nodes still load; [`check_fields`](crate::fields::check_fields) reports
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum NodeData {
    Start {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        metadata: BTreeMap<String, String>,
    },
    Task {
        #[serde(default)]
        assignee: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due_date: Option<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        custom_fields: BTreeMap<String, String>,
    },
    Approval {
        #[serde(default)]
        approver_role: String,
        /// Percentage; anything outside `0..=100` loads and is reported
        /// by the field checks.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_approve_threshold: Option<f64>,
    },
    Automated {
        #[serde(default)]
        action_id: String,
        #[serde(default)]
        params: BTreeMap<String, String>,
    },
    End {
        #[serde(default)]
        message: String,
        /// Request a summary report when the run is valid.
        #[serde(default)]
        summary: bool,
    },
}

impl NodeData {
    /// Empty data for a freshly placed node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => NodeData::Start {
                metadata: BTreeMap::new(),
            },
            NodeKind::Task => NodeData::Task {
                assignee: String::new(),
                description: None,
                due_date: None,
                custom_fields: BTreeMap::new(),
            },
            NodeKind::Approval => NodeData::Approval {
                approver_role: String::new(),
                auto_approve_threshold: None,
            },
            NodeKind::Automated => NodeData::Automated {
                action_id: String::new(),
                params: BTreeMap::new(),
            },
            NodeKind::End => NodeData::End {
                message: String::new(),
                summary: false,
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start { .. } => NodeKind::Start,
            NodeData::Task { .. } => NodeKind::Task,
            NodeData::Approval { .. } => NodeKind::Approval,
            NodeData::Automated { .. } => NodeKind::Automated,
            NodeData::End { .. } => NodeKind::End,
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single step in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within this graph (referenced by edges).
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, title: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Replace the kind-specific fields. The kind itself never changes.
    ///
    /// # Errors
    /// [`EngineError::KindMismatch`] if `data` is for another kind.
    pub fn set_data(&mut self, data: NodeData) -> Result<(), EngineError> {
        if data.kind() != self.kind() {
            return Err(EngineError::KindMismatch {
                node_id: self.id.clone(),
                expected: self.kind(),
                found: data.kind(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Whether this is an end node asking for a summary report.
    pub fn requests_summary(&self) -> bool {
        matches!(self.data, NodeData::End { summary: true, .. })
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed edge from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A workflow: nodes in insertion order plus directed edges in insertion
/// order.
///
/// Node IDs are unique and every edge endpoint names a node; both are
/// checked on construction and on deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphSnapshot")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct GraphSnapshot {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<GraphSnapshot> for Graph {
    type Error = EngineError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self, Self::Error> {
        Graph::new(snapshot.nodes, snapshot.edges)
    }
}

impl Graph {
    /// Build a graph from a snapshot.
    ///
    /// # Errors
    /// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
    /// - [`EngineError::UnknownNodeReference`] if an edge references a missing node.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, EngineError> {
        let mut seen_ids: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen_ids.insert(node.id.as_str()) {
                return Err(EngineError::DuplicateNodeId(node.id.clone()));
            }
        }

        for edge in &edges {
            if !seen_ids.contains(edge.source.as_str()) {
                return Err(EngineError::UnknownNodeReference {
                    node_id: edge.source.clone(),
                    side: "source",
                });
            }
            if !seen_ids.contains(edge.target.as_str()) {
                return Err(EngineError::UnknownNodeReference {
                    node_id: edge.target.clone(),
                    side: "target",
                });
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Targets of every edge leaving `node_id`, in edge order. Empty when
    /// the node has no outgoing edges or does not exist.
    pub fn children_of(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == node_id)
            .map(|e| e.target.as_str())
            .collect()
    }

    /// Nodes of `kind`, in node order.
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind() == kind).collect()
    }

    /// `children_of` for every source at once.
    pub(crate) fn adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::with_capacity(self.nodes.len());
        for edge in &self.edges {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }
        adjacency
    }

    // -----------------------------------------------------------------------
    // Editor mutations
    // -----------------------------------------------------------------------

    /// Append a node.
    ///
    /// # Errors
    /// [`EngineError::DuplicateNodeId`] if the ID is taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), EngineError> {
        if self.node(&node.id).is_some() {
            return Err(EngineError::DuplicateNodeId(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Place a new node of `kind` with a generated ID and a default title
    /// such as `"Task Node"`.
    pub fn add_default_node(&mut self, kind: NodeKind) -> &Node {
        let id = format!("{kind}-{}", Uuid::new_v4().simple());
        self.nodes
            .push(Node::new(id, default_title(kind), NodeData::default_for(kind)));
        &self.nodes[self.nodes.len() - 1]
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == node_id)?;
        self.edges
            .retain(|e| e.source != node_id && e.target != node_id);
        Some(self.nodes.remove(index))
    }

    /// Connect `source → target`. Connecting an already connected pair is
    /// a no-op.
    ///
    /// # Errors
    /// [`EngineError::UnknownNodeReference`] if either endpoint is missing.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), EngineError> {
        if self.node(source).is_none() {
            return Err(EngineError::UnknownNodeReference {
                node_id: source.to_owned(),
                side: "source",
            });
        }
        if self.node(target).is_none() {
            return Err(EngineError::UnknownNodeReference {
                node_id: target.to_owned(),
                side: "target",
            });
        }

        let exists = self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target);
        if !exists {
            self.edges.push(Edge::new(source, target));
        }
        Ok(())
    }

    /// Remove every `source → target` edge. Returns whether one was removed.
    pub fn disconnect(&mut self, source: &str, target: &str) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.source == source && e.target == target));
        self.edges.len() != before
    }

    /// Update a node's title and/or kind-specific data.
    ///
    /// # Errors
    /// - [`EngineError::UnknownNode`] if no node has this ID.
    /// - [`EngineError::KindMismatch`] if `data` is for another kind.
    pub fn update_node(
        &mut self,
        node_id: &str,
        title: Option<String>,
        data: Option<NodeData>,
    ) -> Result<&Node, EngineError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| EngineError::UnknownNode(node_id.to_owned()))?;

        if let Some(data) = data {
            node.set_data(data)?;
        }
        if let Some(title) = title {
            node.title = title;
        }
        Ok(node)
    }
}

fn default_title(kind: NodeKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} Node", first.to_ascii_uppercase(), chars.as_str()),
        None => String::from("Node"),
    }
}
