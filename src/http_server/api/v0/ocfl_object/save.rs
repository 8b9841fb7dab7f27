use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::database::models::OcflObjectVersionRef;
use crate::http_server::api::dto::{OcflObjectVersionDto, OcflObjectVersionParametersDto};
use crate::http_server::api::ApiError;
use crate::state::State;

/// Idempotent PUT: creates or fully replaces the descriptive fields of
/// the version at `(bag_id, object_version)`.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path((bag_id, object_version)): Path<(String, i64)>,
    Json(body): Json<OcflObjectVersionParametersDto>,
) -> Result<Response, ApiError> {
    let reference = OcflObjectVersionRef {
        bag_id,
        object_version,
    };
    let stored = state
        .catalog()
        .save_object_version(&reference, &body.to_record())
        .await?;

    Ok((StatusCode::CREATED, Json(OcflObjectVersionDto::from(&stored))).into_response())
}
