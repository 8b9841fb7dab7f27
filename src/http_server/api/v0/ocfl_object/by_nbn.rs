use axum::extract::{Path, State as AxumState};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::catalog::CatalogError;
use crate::http_server::api::dto::OcflObjectVersionDto;
use crate::http_server::api::ApiError;
use crate::http_server::html::{wants_html, ArchiveDetailTemplate};
use crate::state::State;

/// Object versions under an NBN: JSON list, or the archive-detail page
/// for browsers.
pub async fn handler(
    AxumState(state): AxumState<State>,
    headers: HeaderMap,
    Path(nbn): Path<String>,
) -> Result<Response, ApiError> {
    if wants_html(&headers) {
        return match state.catalog().find_object_versions_by_nbn(&nbn).await {
            Ok(versions) => Ok(ArchiveDetailTemplate::new(&nbn, &versions).into_response()),
            Err(CatalogError::NotFound(_)) => Ok((
                StatusCode::NOT_FOUND,
                format!("No OCFL object versions found for NBN {nbn}"),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        };
    }

    let versions = state.catalog().find_object_versions_by_nbn(&nbn).await?;
    let dtos: Vec<OcflObjectVersionDto> =
        versions.iter().map(OcflObjectVersionDto::from).collect();
    Ok(Json(dtos).into_response())
}
