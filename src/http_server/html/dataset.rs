use askama::Template;

use crate::catalog::DatasetDetail;

use super::format_timestamp;

#[derive(Template)]
#[template(path = "dataset.html")]
pub struct DatasetTemplate {
    pub nbn: String,
    pub ocfl_storage_root: String,
    pub data_supplier: String,
    pub sword_token: String,
    pub dataverse_pid: String,
    pub exports: Vec<VersionExportRow>,
}

/// Pre-formatted row; templates render plain strings only.
#[derive(Debug, Clone)]
pub struct VersionExportRow {
    pub version_number: i64,
    pub bag_id: String,
    pub title: String,
    pub created: String,
    pub archived: String,
    pub skeleton_record: bool,
    pub file_count: usize,
}

impl From<&DatasetDetail> for DatasetTemplate {
    fn from(detail: &DatasetDetail) -> Self {
        let exports = detail
            .exports
            .iter()
            .map(|e| VersionExportRow {
                version_number: e.export.ocfl_object_version_number,
                bag_id: e.export.bag_id.to_string(),
                title: e.export.title.clone().unwrap_or_default(),
                created: format_timestamp(e.export.created_timestamp),
                archived: e
                    .export
                    .archived_timestamp
                    .map(format_timestamp)
                    .unwrap_or_else(|| "pending".to_string()),
                skeleton_record: e.export.skeleton_record,
                file_count: e.file_metas.len(),
            })
            .collect();

        Self {
            nbn: detail.dataset.nbn.clone(),
            ocfl_storage_root: detail.dataset.ocfl_storage_root.clone(),
            data_supplier: detail.dataset.data_supplier.clone().unwrap_or_default(),
            sword_token: detail.dataset.sword_token.clone().unwrap_or_default(),
            dataverse_pid: detail.dataset.dataverse_pid.clone().unwrap_or_default(),
            exports,
        }
    }
}
