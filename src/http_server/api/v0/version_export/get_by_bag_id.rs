use axum::extract::{Path, State as AxumState};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::catalog::CatalogError;
use crate::database::types::UrnUuid;
use crate::http_server::api::dto::VersionExportDto;
use crate::http_server::api::ApiError;
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    Path(bag_id): Path<String>,
) -> Result<Response, ApiError> {
    let bag_id: UrnUuid = bag_id.parse().map_err(CatalogError::from)?;
    let (dataset, detail) = state.catalog().find_version_export_by_bag_id(&bag_id).await?;
    Ok(Json(VersionExportDto::from_detail(&dataset.nbn, &detail)).into_response())
}
