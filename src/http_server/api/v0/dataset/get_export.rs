use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::dto::VersionExportDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path((nbn, version_number)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let detail = state
        .catalog()
        .find_version_export(&nbn, version_number)
        .await?;
    Ok(Json(VersionExportDto::from_detail(&nbn, &detail)).into_response())
}
