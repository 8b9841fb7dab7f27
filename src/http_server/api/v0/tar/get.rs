use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::http_server::api::dto::TarDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(tar_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let detail = state.catalog().find_tar(tar_id).await?;
    Ok(Json(TarDto::from(&detail)).into_response())
}
