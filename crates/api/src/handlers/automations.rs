use axum::extract::State;
use axum::Json;

use crate::{ApiError, AppState};
use actions::AutomationAction;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<AutomationAction>>, ApiError> {
    let actions = state.catalog.list().await?;
    Ok(Json(actions))
}
