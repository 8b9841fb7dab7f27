use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::catalog::CatalogError;

/// API-boundary error: the catalog taxonomy plus request-shape problems
/// that never reach the engine.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(err) => match err {
                CatalogError::AlreadyExists(_)
                | CatalogError::InvalidSequence(_)
                | CatalogError::Conflict(_)
                | CatalogError::AlreadyInContainer { .. } => StatusCode::CONFLICT,
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::MalformedBagId(_) => StatusCode::BAD_REQUEST,
                CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("api request failed: {self}");
            return (
                status,
                Json(serde_json::json!({ "error": "internal server error" })),
            )
                .into_response();
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
