use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::dto::{VersionExportDto, VersionExportParametersDto};
use crate::http_server::api::ApiError;
use crate::state::State;

/// PUT onto an explicit version number. Only the latest export can be
/// targeted, and only while it is still a skeleton record.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path((nbn, version_number)): Path<(String, i64)>,
    Json(body): Json<VersionExportParametersDto>,
) -> Result<Response, ApiError> {
    if body.ocfl_object_version_number != version_number {
        return Err(ApiError::BadRequest(format!(
            "version number in path ({version_number}) does not match body ({})",
            body.ocfl_object_version_number
        )));
    }

    let detail = state
        .catalog()
        .append_or_amend_version_export(&nbn, version_number, &body.to_record())
        .await?;

    Ok(Json(VersionExportDto::from_detail(&nbn, &detail)).into_response())
}
