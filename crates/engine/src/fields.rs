//! Per-node field checks.
//!
//! Mirrors the rules the editor's forms enforce: required titles, required
//! kind-specific fields, the approval threshold range and, for automated
//! nodes, the parameters the chosen catalog action requires. These never
//! influence validation or simulation.

use actions::AutomationAction;
use serde::{Deserialize, Serialize};

use crate::models::{Graph, Node, NodeData};

/// A node field that fails its form rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub node_id: String,
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(node: &Node, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id: node.id.clone(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check every node's fields against its kind's rules, in node order.
pub fn check_fields(graph: &Graph, actions: &[AutomationAction]) -> Vec<FieldError> {
    graph
        .nodes()
        .iter()
        .flat_map(|node| check_node(node, actions))
        .collect()
}

fn check_node(node: &Node, actions: &[AutomationAction]) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(&node.title) {
        errors.push(FieldError::new(node, "title", "Title is required"));
    }

    match node.data() {
        NodeData::Start { .. } => {}
        NodeData::Task { assignee, .. } => {
            if is_blank(assignee) {
                errors.push(FieldError::new(node, "assignee", "Assignee is required"));
            }
        }
        NodeData::Approval {
            approver_role,
            auto_approve_threshold,
        } => {
            if is_blank(approver_role) {
                errors.push(FieldError::new(
                    node,
                    "approverRole",
                    "Approver role is required",
                ));
            }
            if auto_approve_threshold.is_some_and(|t| !(0.0..=100.0).contains(&t)) {
                errors.push(FieldError::new(
                    node,
                    "autoApproveThreshold",
                    "Auto-approve threshold must be between 0 and 100",
                ));
            }
        }
        NodeData::Automated { action_id, params } => {
            if is_blank(action_id) {
                errors.push(FieldError::new(node, "actionId", "Action is required"));
            } else if let Some(action) = actions.iter().find(|a| &a.id == action_id) {
                for name in &action.params {
                    if params.get(name).map_or(true, |v| is_blank(v)) {
                        errors.push(FieldError::new(
                            node,
                            format!("params.{name}"),
                            format!("Parameter '{name}' is required"),
                        ));
                    }
                }
            } else {
                errors.push(FieldError::new(
                    node,
                    "actionId",
                    format!("Unknown action '{action_id}'"),
                ));
            }
        }
        NodeData::End { message, .. } => {
            if is_blank(message) {
                errors.push(FieldError::new(node, "message", "End message is required"));
            }
        }
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
