#![allow(dead_code)]

use vault_catalog::catalog::Catalog;
use vault_catalog::database::dataset_queries::{FileMetaRecord, NewDataset, VersionExportRecord};
use vault_catalog::database::Database;

/// Fresh catalog over an in-memory database with migrations applied.
pub async fn setup_catalog() -> Catalog {
    let url = url::Url::parse("sqlite::memory:").unwrap();
    let database = Database::connect(&url).await.unwrap();
    Catalog::new(database, None)
}

pub fn new_dataset(nbn: &str) -> NewDataset {
    NewDataset {
        nbn: nbn.to_string(),
        ocfl_storage_root: "srd/storage01".to_string(),
        data_supplier: Some("utrecht-university".to_string()),
        sword_token: None,
        dataverse_pid: None,
    }
}

pub fn export_record(bag_id: &str) -> VersionExportRecord {
    VersionExportRecord {
        bag_id: bag_id.parse().unwrap(),
        title: Some("A test deposit".to_string()),
        dataverse_pid_version: None,
        other_id: None,
        other_id_version: None,
        metadata: None,
        deaccessioned: false,
        exporter: Some("dd-transfer-to-vault".to_string()),
        exporter_version: Some("1.0.0".to_string()),
        skeleton_record: false,
        file_metas: vec![FileMetaRecord {
            filepath: "data/document.pdf".to_string(),
            file_uri: format!("{bag_id}/data/document.pdf"),
            byte_size: 1024,
            sha1sum: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
        }],
    }
}

pub fn skeleton_export_record(bag_id: &str) -> VersionExportRecord {
    VersionExportRecord {
        title: None,
        file_metas: Vec::new(),
        skeleton_record: true,
        ..export_record(bag_id)
    }
}
