//! `api` crate — HTTP surface of the workflow simulator.
//!
//! Exposes:
//!   GET    /api/v1/automations
//!   POST   /api/v1/validate
//!   POST   /api/v1/simulate

pub mod error;
pub mod handlers;

use std::sync::Arc;

use actions::{AutomationCatalog, StaticCatalog};
use axum::routing::{get, post};
use axum::Router;
use engine::WorkflowSimulator;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<WorkflowSimulator>,
    pub catalog: Arc<dyn AutomationCatalog>,
}

impl AppState {
    pub fn new(simulator: WorkflowSimulator, catalog: Arc<dyn AutomationCatalog>) -> Self {
        Self {
            simulator: Arc::new(simulator),
            catalog,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WorkflowSimulator::default(), Arc::new(StaticCatalog::builtin()))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/automations", get(handlers::automations::list))
        .route("/api/v1/validate", post(handlers::simulate::validate))
        .route("/api/v1/simulate", post(handlers::simulate::simulate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `bind` and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> Result<(), ApiError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
