use axum::extract::{Path, State as AxumState};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::catalog::CatalogError;
use crate::http_server::api::dto::DatasetDto;
use crate::http_server::api::ApiError;
use crate::http_server::html::{wants_html, DatasetTemplate};
use crate::state::State;

pub async fn handler(
    AxumState(state): AxumState<State>,
    headers: HeaderMap,
    Path(nbn): Path<String>,
) -> Result<Response, ApiError> {
    if wants_html(&headers) {
        return match state.catalog().find_dataset(&nbn).await {
            Ok(detail) => Ok(DatasetTemplate::from(&detail).into_response()),
            Err(CatalogError::NotFound(_)) => Ok((
                StatusCode::NOT_FOUND,
                format!("No dataset found for NBN {nbn}"),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        };
    }

    let detail = state.catalog().find_dataset(&nbn).await?;
    Ok(Json(DatasetDto::from(&detail)).into_response())
}
