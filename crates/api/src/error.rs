//! Typed error type for the api crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] engine::EngineError),

    #[error(transparent)]
    Catalog(#[from] actions::CatalogError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(engine::EngineError::GraphTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("request failed with {}: {}", status, self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
