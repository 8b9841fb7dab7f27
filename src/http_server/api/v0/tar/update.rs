use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::http_server::api::dto::{TarDto, TarParameterDto};
use crate::http_server::api::ApiError;
use crate::state::State;

/// PUT replaces the tar's parts, path, timestamp, and membership.
/// Re-submitting a version the tar already holds is a no-op.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(tar_id): Path<Uuid>,
    Json(body): Json<TarParameterDto>,
) -> Result<Response, ApiError> {
    if let Some(body_id) = body.tar_uuid {
        if body_id != tar_id {
            return Err(ApiError::BadRequest(format!(
                "tar id in path ({tar_id}) does not match body ({body_id})"
            )));
        }
    }

    let detail = state
        .catalog()
        .update_tar(tar_id, &body.to_record(), &body.member_refs())
        .await?;

    Ok(Json(TarDto::from(&detail)).into_response())
}
