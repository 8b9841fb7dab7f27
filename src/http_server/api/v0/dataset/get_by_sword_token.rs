use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::dto::DatasetDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(sword_token): Path<String>,
) -> Result<Response, ApiError> {
    let detail = state
        .catalog()
        .find_dataset_by_sword_token(&sword_token)
        .await?;
    Ok(Json(DatasetDto::from(&detail)).into_response())
}
