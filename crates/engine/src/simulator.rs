//! Workflow simulation engine.
//!
//! `WorkflowSimulator` is the central orchestrator:
//! 1. Validates the graph; a graph with violations is never traversed.
//! 2. Walks the graph depth-first, pre-order, from the first start node,
//!    emitting one execution event per node reached.
//! 3. Requires at least one end node.
//! 4. Compiles a summary report when the run is valid and an end node
//!    asks for one.
//!
//! Nothing is executed for real: an event is emitted already `completed`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::dag::{validate, Violation};
use crate::models::{Graph, Node, NodeKind};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Largest graph (in nodes) the simulator accepts.
    pub max_nodes: usize,
}

impl SimulatorConfig {
    pub const DEFAULT_MAX_NODES: usize = 10_000;
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }
}

// ---------------------------------------------------------------------------
// Execution trace
// ---------------------------------------------------------------------------

/// Lifecycle state of one step. Only `completed` is produced today;
/// `pending` and `error` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Executing,
    Completed,
    Error,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Executing => "executing",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visit of the traversal to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEvent {
    pub node_id: String,
    pub status: StepStatus,
    pub message: String,
}

impl ExecutionEvent {
    /// An untitled node is announced as `Node`.
    fn completed(node: &Node) -> Self {
        let title = if node.title.is_empty() { "Node" } else { &node.title };
        Self {
            node_id: node.id.clone(),
            status: StepStatus::Completed,
            message: format!("Executing {title} ({})", node.kind()),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Success,
    Failed,
}

/// A step in the summary's execution log, joined with its node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub node_id: String,
    pub node_title: String,
    pub node_type: String,
    pub status: StepStatus,
    pub message: String,
}

/// Aggregate report produced for a valid run when an end node requests it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub generated_at: DateTime<Utc>,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub workflow_status: WorkflowStatus,
    pub execution_log: Vec<LogEntry>,
}

impl SummaryReport {
    fn compile(graph: &Graph, steps: &[ExecutionEvent], valid: bool) -> Self {
        let execution_log = steps
            .iter()
            .map(|step| {
                let node = graph.node(&step.node_id);
                LogEntry {
                    node_id: step.node_id.clone(),
                    node_title: node
                        .map(|n| n.title.as_str())
                        .filter(|title| !title.is_empty())
                        .unwrap_or("Unknown")
                        .to_owned(),
                    node_type: node
                        .map_or_else(|| "unknown".to_owned(), |n| n.kind().to_string()),
                    status: step.status,
                    message: step.message.clone(),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            total_steps: steps.len(),
            completed_steps: steps
                .iter()
                .filter(|s| s.status == StepStatus::Completed)
                .count(),
            workflow_status: if valid {
                WorkflowStatus::Success
            } else {
                WorkflowStatus::Failed
            },
            execution_log,
        }
    }
}

// ---------------------------------------------------------------------------
// Output of a simulation
// ---------------------------------------------------------------------------

/// The result of simulating a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub steps: Vec<ExecutionEvent>,
    pub valid: bool,
    pub errors: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryReport>,
}

impl SimulationResult {
    fn rejected(errors: Vec<Violation>) -> Self {
        Self {
            steps: Vec::new(),
            valid: false,
            errors,
            summary: None,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowSimulator
// ---------------------------------------------------------------------------

/// Stateless orchestrator that simulates one graph snapshot per call.
///
/// Nothing is retained between calls; simulating the same graph twice
/// yields the same steps and errors.
#[derive(Debug, Clone, Default)]
pub struct WorkflowSimulator {
    config: SimulatorConfig,
}

impl WorkflowSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Refuse graphs larger than `max_nodes`. Every entry point that walks
    /// a graph (simulation and validation alike) goes through this first.
    ///
    /// # Errors
    /// [`EngineError::GraphTooLarge`] if the graph exceeds `max_nodes`.
    pub fn check_size(&self, graph: &Graph) -> Result<(), EngineError> {
        let nodes = graph.nodes().len();
        if nodes > self.config.max_nodes {
            warn!("refusing graph with {} nodes (limit {})", nodes, self.config.max_nodes);
            return Err(EngineError::GraphTooLarge {
                nodes,
                limit: self.config.max_nodes,
            });
        }
        Ok(())
    }

    /// Simulate the workflow.
    ///
    /// Structural problems are reported in [`SimulationResult::errors`].
    ///
    /// # Errors
    /// [`EngineError::GraphTooLarge`] if the graph exceeds `max_nodes`.
    #[instrument(skip(self, graph), fields(nodes = graph.nodes().len(), edges = graph.edges().len()))]
    pub fn simulate(&self, graph: &Graph) -> Result<SimulationResult, EngineError> {
        self.check_size(graph)?;

        // ------------------------------------------------------------------
        // Validate; invalid graphs are never traversed.
        // ------------------------------------------------------------------
        let violations = validate(graph);
        if !violations.is_empty() {
            info!("graph rejected by validation: {:?}", violations);
            return Ok(SimulationResult::rejected(violations));
        }

        // Multiple start nodes are tolerated; only the first is traversed.
        let Some(start) = graph.find_by_kind(NodeKind::Start).first().copied() else {
            return Ok(SimulationResult::rejected(vec![Violation::NoStartNode]));
        };

        // ------------------------------------------------------------------
        // Traverse.
        // ------------------------------------------------------------------
        let traversal = traverse(graph, start);
        debug!(
            "traversal from '{}' visited {} nodes",
            start.id,
            traversal.steps.len()
        );

        let mut errors = Vec::new();
        if traversal.cycle {
            errors.push(Violation::CycleDetected);
        }
        if graph.find_by_kind(NodeKind::End).is_empty() {
            errors.push(Violation::NoEndNode);
        }
        let valid = errors.is_empty();

        // ------------------------------------------------------------------
        // Summary report.
        // ------------------------------------------------------------------
        let summary = (valid && graph.nodes().iter().any(Node::requests_summary))
            .then(|| SummaryReport::compile(graph, &traversal.steps, valid));

        info!(
            "simulation finished: {} steps, valid = {}, errors = {:?}",
            traversal.steps.len(),
            valid,
            errors
        );

        Ok(SimulationResult {
            steps: traversal.steps,
            valid,
            errors,
            summary,
        })
    }

    /// Async entry point for callers on a runtime. The computation is
    /// synchronous; no I/O happens.
    pub async fn run(&self, graph: &Graph) -> Result<SimulationResult, EngineError> {
        self.simulate(graph)
    }
}

/// Simulate with the default configuration.
pub fn simulate(graph: &Graph) -> Result<SimulationResult, EngineError> {
    WorkflowSimulator::default().simulate(graph)
}

// ---------------------------------------------------------------------------
// Internal: depth-first traversal.
// ---------------------------------------------------------------------------

struct Traversal {
    steps: Vec<ExecutionEvent>,
    /// A node on the active path was reached again. Cannot happen once
    /// validation has passed.
    cycle: bool,
}

/// Pre-order walk with an explicit stack. Children are entered in edge
/// order. A node reached a second time is a merge point and is skipped.
fn traverse(graph: &Graph, start: &Node) -> Traversal {
    let adjacency = graph.adjacency();
    let nodes: HashMap<&str, &Node> = graph.nodes().iter().map(|n| (n.id.as_str(), n)).collect();

    let mut steps = vec![ExecutionEvent::completed(start)];
    let mut visited: HashSet<&str> = HashSet::from([start.id.as_str()]);
    let mut on_path: HashSet<&str> = HashSet::from([start.id.as_str()]);
    let mut stack: Vec<(&str, usize)> = vec![(start.id.as_str(), 0)];
    let mut cycle = false;

    while let Some(frame) = stack.last_mut() {
        let (node_id, next) = *frame;
        let child = adjacency
            .get(node_id)
            .and_then(|children| children.get(next))
            .copied();

        let Some(child) = child else {
            on_path.remove(node_id);
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if on_path.contains(child) {
            if !cycle {
                warn!("node '{}' reached again on its own path", child);
            }
            cycle = true;
            continue;
        }
        if !visited.insert(child) {
            continue;
        }
        let Some(node) = nodes.get(child) else {
            continue;
        };

        steps.push(ExecutionEvent::completed(node));
        on_path.insert(child);
        stack.push((child, 0));
    }

    Traversal { steps, cycle }
}
