use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::http_server::api::dto::{VersionExportDto, VersionExportParametersDto};
use crate::http_server::api::ApiError;
use crate::state::State;

/// POST the next version export. The body carries the requested number;
/// the engine decides whether this appends or amends the latest.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(nbn): Path<String>,
    Json(body): Json<VersionExportParametersDto>,
) -> Result<Response, ApiError> {
    let detail = state
        .catalog()
        .append_or_amend_version_export(&nbn, body.ocfl_object_version_number, &body.to_record())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VersionExportDto::from_detail(&nbn, &detail)),
    )
        .into_response())
}
