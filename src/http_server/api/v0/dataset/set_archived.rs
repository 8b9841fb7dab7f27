use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::http_server::api::ApiError;
use crate::state::State;

#[derive(Debug, Deserialize)]
pub struct ArchivedTimestampDto {
    #[serde(with = "time::serde::rfc3339")]
    pub archived_timestamp: OffsetDateTime,
}

/// Confirm archival of one export. One-shot: a second PUT is a 409.
pub async fn handler(
    AxumState(state): AxumState<State>,
    Path((nbn, version_number)): Path<(String, i64)>,
    Json(body): Json<ArchivedTimestampDto>,
) -> Result<Response, ApiError> {
    state
        .catalog()
        .set_archived_timestamp(&nbn, version_number, body.archived_timestamp)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
