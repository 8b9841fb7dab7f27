use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::html::{wants_html, NotFoundTemplate};

/// Fallback for unmatched routes: the catalog's not-found page for
/// browsers, the API error shape for everything else.
pub async fn not_found_handler(headers: HeaderMap) -> Response {
    if wants_html(&headers) {
        return (StatusCode::NOT_FOUND, NotFoundTemplate::default()).into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "no such resource in the catalog" })),
    )
        .into_response()
}
