//! `engine` crate — the workflow graph model, structural validation, and the
//! simulation engine.

pub mod models;
pub mod error;
pub mod dag;
pub mod fields;
pub mod simulator;

pub use models::{Graph, Node, NodeData, NodeKind, Edge};
pub use error::EngineError;
pub use dag::{validate, Violation};
pub use fields::{check_fields, FieldError};
pub use simulator::{
    simulate, ExecutionEvent, LogEntry, SimulationResult, SimulatorConfig, StepStatus,
    SummaryReport, WorkflowSimulator, WorkflowStatus,
};
