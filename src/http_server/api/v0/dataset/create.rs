use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::catalog::DatasetDetail;
use crate::http_server::api::dto::DatasetDto;
use crate::http_server::api::ApiError;
use crate::state::State;

/// PUT a new dataset under its NBN. The body must carry the same NBN as
/// the path; registration starts with zero version exports.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(nbn): Path<String>,
    Json(body): Json<DatasetDto>,
) -> Result<Response, ApiError> {
    if body.nbn != nbn {
        return Err(ApiError::BadRequest(format!(
            "nbn in path ({nbn}) does not match nbn in body ({})",
            body.nbn
        )));
    }

    let dataset = state
        .catalog()
        .register_dataset(&body.to_new_dataset())
        .await?;

    let detail = DatasetDetail {
        dataset,
        exports: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(DatasetDto::from(&detail))).into_response())
}
