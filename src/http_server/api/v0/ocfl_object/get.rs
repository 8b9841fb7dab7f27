use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::dto::OcflObjectVersionDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path((bag_id, object_version)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let version = state
        .catalog()
        .find_object_version(&bag_id, object_version)
        .await?;
    Ok(Json(OcflObjectVersionDto::from(&version)).into_response())
}
