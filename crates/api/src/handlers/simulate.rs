use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::{ApiError, AppState};
use engine::{check_fields, validate as validate_graph, FieldError, Graph, SimulationResult, Violation};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// No structural violations. Field errors don't affect this.
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub field_errors: Vec<FieldError>,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(graph): Json<Graph>,
) -> Result<Json<ValidationReport>, ApiError> {
    state.simulator.check_size(&graph)?;
    let violations = validate_graph(&graph);
    let actions = state.catalog.list().await?;
    let field_errors = check_fields(&graph, &actions);

    Ok(Json(ValidationReport {
        valid: violations.is_empty(),
        violations,
        field_errors,
    }))
}

pub async fn simulate(
    State(state): State<AppState>,
    Json(graph): Json<Graph>,
) -> Result<Json<SimulationResult>, ApiError> {
    let result = state.simulator.run(&graph).await?;
    Ok(Json(result))
}
