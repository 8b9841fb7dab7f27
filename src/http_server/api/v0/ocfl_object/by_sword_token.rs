use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::dto::OcflObjectVersionDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(sword_token): Path<String>,
) -> Result<Response, ApiError> {
    let versions = state
        .catalog()
        .find_object_versions_by_sword_token(&sword_token)
        .await?;
    let dtos: Vec<OcflObjectVersionDto> =
        versions.iter().map(OcflObjectVersionDto::from).collect();
    Ok(Json(dtos).into_response())
}
