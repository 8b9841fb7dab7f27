use axum::extract::State as AxumState;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::http_server::api::dto::{TarDto, TarParameterDto};
use crate::http_server::api::ApiError;
use crate::state::State;

/// POST a sealed tar. Every referenced object version must exist and be
/// unclaimed; any rejection leaves the catalog untouched.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Json(body): Json<TarParameterDto>,
) -> Result<Response, ApiError> {
    let tar_id = body
        .tar_uuid
        .ok_or_else(|| ApiError::BadRequest("tar_uuid is required".to_string()))?;

    let detail = state
        .catalog()
        .create_tar(tar_id, &body.to_record(), &body.member_refs())
        .await?;

    Ok((StatusCode::CREATED, Json(TarDto::from(&detail))).into_response())
}
