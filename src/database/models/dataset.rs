use time::OffsetDateTime;

use crate::database::types::UrnUuid;

/// Storage limit for version export titles.
pub const TITLE_MAX_LENGTH: usize = 300;

const ELLIPSIS: &str = "...";

/// A dataset known to the catalog, keyed by its persistent NBN identifier.
///
/// Version exports reference the dataset through `dataset_id` rather than
/// holding a live back-reference, so serialization never recurses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Dataset {
    pub id: i64,
    pub nbn: String,
    pub ocfl_storage_root: String,
    pub data_supplier: Option<String>,
    pub sword_token: Option<String>,
    pub dataverse_pid: Option<String>,
}

/// One archival export of a dataset version.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatasetVersionExport {
    pub id: i64,
    pub dataset_id: i64,
    pub bag_id: UrnUuid,
    pub ocfl_object_version_number: i64,
    pub created_timestamp: OffsetDateTime,
    pub archived_timestamp: Option<OffsetDateTime>,
    pub title: Option<String>,
    pub dataverse_pid_version: Option<String>,
    pub other_id: Option<String>,
    pub other_id_version: Option<String>,
    pub metadata: Option<String>,
    pub deaccessioned: bool,
    pub exporter: Option<String>,
    pub exporter_version: Option<String>,
    pub skeleton_record: bool,
}

/// File-level metadata owned by one version export.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileMeta {
    pub id: i64,
    pub version_export_id: i64,
    pub filepath: String,
    pub file_uri: String,
    pub byte_size: i64,
    pub sha1sum: String,
}

/// Row shape for the unconfirmed-exports listing, joined with its dataset.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnconfirmedVersionExport {
    pub dataset_nbn: String,
    pub ocfl_storage_root: String,
    pub bag_id: UrnUuid,
    pub ocfl_object_version_number: i64,
}

/// Fit a title into the storage bound.
///
/// Over-long titles are truncated with a 3-character ellipsis marker so the
/// result is exactly `TITLE_MAX_LENGTH` characters. This is a normalization
/// rule, not a validation error.
pub fn normalize_title(title: Option<String>) -> Option<String> {
    title.map(|t| {
        if t.chars().count() > TITLE_MAX_LENGTH {
            let mut truncated: String = t.chars().take(TITLE_MAX_LENGTH - ELLIPSIS.len()).collect();
            truncated.push_str(ELLIPSIS);
            truncated
        } else {
            t
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_at_bound_is_unchanged() {
        let title = "a".repeat(TITLE_MAX_LENGTH);
        assert_eq!(normalize_title(Some(title.clone())), Some(title));
    }

    #[test]
    fn title_over_bound_is_truncated_to_exactly_the_bound() {
        let title = "a".repeat(TITLE_MAX_LENGTH + 1);
        let normalized = normalize_title(Some(title)).unwrap();
        assert_eq!(normalized.chars().count(), TITLE_MAX_LENGTH);
        assert!(normalized.ends_with("..."));
    }

    #[test]
    fn multibyte_titles_are_counted_in_characters() {
        let title = "ß".repeat(TITLE_MAX_LENGTH + 40);
        let normalized = normalize_title(Some(title)).unwrap();
        assert_eq!(normalized.chars().count(), TITLE_MAX_LENGTH);
    }

    #[test]
    fn absent_title_stays_absent() {
        assert_eq!(normalize_title(None), None);
    }
}
