use axum::extract::{Query, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::http_server::api::dto::UnconfirmedDatasetVersionExportDto;
use crate::http_server::api::ApiError;
use crate::state::State;

const DEFAULT_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct UnconfirmedQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Exports still awaiting archival confirmation. A point-in-time page,
/// not a queue: concurrent confirmations may make it stale immediately.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Query(query): Query<UnconfirmedQuery>,
) -> Result<Response, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = state.catalog().list_unconfirmed(limit, offset).await?;
    let dtos: Vec<UnconfirmedDatasetVersionExportDto> = rows
        .iter()
        .map(UnconfirmedDatasetVersionExportDto::from)
        .collect();
    Ok(Json(dtos).into_response())
}
