mod archive_detail;
mod dataset;
mod find_dataset;
mod not_found;

pub use archive_detail::ArchiveDetailTemplate;
pub use dataset::DatasetTemplate;
pub use find_dataset::FindDatasetTemplate;
pub use not_found::NotFoundTemplate;

use axum::http::HeaderMap;

/// Browsers announce `text/html` in Accept; API clients don't.
pub fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(axum::http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

pub(crate) fn format_timestamp(ts: time::OffsetDateTime) -> String {
    ts.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| ts.to_string())
}
