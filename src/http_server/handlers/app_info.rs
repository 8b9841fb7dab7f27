use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::html::{wants_html, FindDatasetTemplate};

/// Root handler: app info as JSON, or the find-dataset page for browsers.
pub async fn app_info_handler(headers: HeaderMap) -> Response {
    if wants_html(&headers) {
        return FindDatasetTemplate::default().into_response();
    }

    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
