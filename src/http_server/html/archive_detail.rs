use askama::Template;

use crate::database::models::OcflObjectVersion;

use super::format_timestamp;

#[derive(Template)]
#[template(path = "archive_detail.html")]
pub struct ArchiveDetailTemplate {
    pub nbn: String,
    pub versions: Vec<ObjectVersionRow>,
}

#[derive(Debug, Clone)]
pub struct ObjectVersionRow {
    pub bag_id: String,
    pub object_version: i64,
    pub ocfl_object_path: String,
    pub created: String,
    pub tar_id: String,
    pub skeleton_record: bool,
}

impl ArchiveDetailTemplate {
    pub fn new(nbn: &str, versions: &[OcflObjectVersion]) -> Self {
        let rows = versions
            .iter()
            .map(|v| ObjectVersionRow {
                bag_id: v.bag_id.clone(),
                object_version: v.object_version,
                ocfl_object_path: v.ocfl_object_path.clone().unwrap_or_default(),
                created: format_timestamp(v.created),
                tar_id: v
                    .tar_id
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "not archived".to_string()),
                skeleton_record: v.skeleton_record,
            })
            .collect();

        Self {
            nbn: nbn.to_string(),
            versions: rows,
        }
    }
}
