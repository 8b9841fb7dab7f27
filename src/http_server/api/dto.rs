//! Wire DTOs and their conversions to and from the catalog's entities.
//!
//! Conversion is plain functions and `From` impls; no shared mapper state.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::{DatasetDetail, ExportDetail, TarDetail};
use crate::database::dataset_queries::{FileMetaRecord, NewDataset, VersionExportRecord};
use crate::database::models::{
    FileMeta, OcflObjectVersion, OcflObjectVersionRef, UnconfirmedVersionExport,
};
use crate::database::object_queries::ObjectVersionRecord;
use crate::database::tar_queries::{TarPartRecord, TarRecord};
use crate::database::types::UrnUuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDto {
    pub nbn: String,
    pub ocfl_storage_root: String,
    #[serde(default)]
    pub data_supplier: Option<String>,
    #[serde(default)]
    pub sword_token: Option<String>,
    #[serde(default)]
    pub dataverse_pid: Option<String>,
    #[serde(default)]
    pub version_exports: Vec<VersionExportDto>,
}

impl DatasetDto {
    pub fn to_new_dataset(&self) -> NewDataset {
        NewDataset {
            nbn: self.nbn.clone(),
            ocfl_storage_root: self.ocfl_storage_root.clone(),
            data_supplier: self.data_supplier.clone(),
            sword_token: self.sword_token.clone(),
            dataverse_pid: self.dataverse_pid.clone(),
        }
    }
}

impl From<&DatasetDetail> for DatasetDto {
    fn from(detail: &DatasetDetail) -> Self {
        Self {
            nbn: detail.dataset.nbn.clone(),
            ocfl_storage_root: detail.dataset.ocfl_storage_root.clone(),
            data_supplier: detail.dataset.data_supplier.clone(),
            sword_token: detail.dataset.sword_token.clone(),
            dataverse_pid: detail.dataset.dataverse_pid.clone(),
            version_exports: detail
                .exports
                .iter()
                .map(|e| VersionExportDto::from_detail(&detail.dataset.nbn, e))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionExportDto {
    pub dataset_nbn: String,
    pub bag_id: UrnUuid,
    pub ocfl_object_version_number: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_timestamp: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub archived_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dataverse_pid_version: Option<String>,
    #[serde(default)]
    pub other_id: Option<String>,
    #[serde(default)]
    pub other_id_version: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub deaccessioned: bool,
    #[serde(default)]
    pub exporter: Option<String>,
    #[serde(default)]
    pub exporter_version: Option<String>,
    #[serde(default)]
    pub skeleton_record: bool,
    #[serde(default)]
    pub file_metas: Vec<FileMetaDto>,
}

impl VersionExportDto {
    pub fn from_detail(nbn: &str, detail: &ExportDetail) -> Self {
        Self {
            dataset_nbn: nbn.to_string(),
            bag_id: detail.export.bag_id,
            ocfl_object_version_number: detail.export.ocfl_object_version_number,
            created_timestamp: detail.export.created_timestamp,
            archived_timestamp: detail.export.archived_timestamp,
            title: detail.export.title.clone(),
            dataverse_pid_version: detail.export.dataverse_pid_version.clone(),
            other_id: detail.export.other_id.clone(),
            other_id_version: detail.export.other_id_version.clone(),
            metadata: metadata_to_value(&detail.export.metadata),
            deaccessioned: detail.export.deaccessioned,
            exporter: detail.export.exporter.clone(),
            exporter_version: detail.export.exporter_version.clone(),
            skeleton_record: detail.export.skeleton_record,
            file_metas: detail.file_metas.iter().map(FileMetaDto::from).collect(),
        }
    }
}

/// Input shape for append and amend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionExportParametersDto {
    pub bag_id: UrnUuid,
    pub ocfl_object_version_number: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dataverse_pid_version: Option<String>,
    #[serde(default)]
    pub other_id: Option<String>,
    #[serde(default)]
    pub other_id_version: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub deaccessioned: bool,
    #[serde(default)]
    pub exporter: Option<String>,
    #[serde(default)]
    pub exporter_version: Option<String>,
    #[serde(default)]
    pub skeleton_record: bool,
    #[serde(default)]
    pub file_metas: Vec<FileMetaDto>,
}

impl VersionExportParametersDto {
    pub fn to_record(&self) -> VersionExportRecord {
        VersionExportRecord {
            bag_id: self.bag_id,
            title: self.title.clone(),
            dataverse_pid_version: self.dataverse_pid_version.clone(),
            other_id: self.other_id.clone(),
            other_id_version: self.other_id_version.clone(),
            metadata: metadata_to_string(&self.metadata),
            deaccessioned: self.deaccessioned,
            exporter: self.exporter.clone(),
            exporter_version: self.exporter_version.clone(),
            skeleton_record: self.skeleton_record,
            file_metas: self.file_metas.iter().map(FileMetaDto::to_record).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetaDto {
    pub filepath: String,
    pub file_uri: String,
    pub byte_size: i64,
    pub sha1sum: String,
}

impl FileMetaDto {
    fn to_record(&self) -> FileMetaRecord {
        FileMetaRecord {
            filepath: self.filepath.clone(),
            file_uri: self.file_uri.clone(),
            byte_size: self.byte_size,
            sha1sum: self.sha1sum.clone(),
        }
    }
}

impl From<&FileMeta> for FileMetaDto {
    fn from(file_meta: &FileMeta) -> Self {
        Self {
            filepath: file_meta.filepath.clone(),
            file_uri: file_meta.file_uri.clone(),
            byte_size: file_meta.byte_size,
            sha1sum: file_meta.sha1sum.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnconfirmedDatasetVersionExportDto {
    pub dataset_nbn: String,
    pub storage_root: String,
    pub bag_id: UrnUuid,
    pub ocfl_object_version_number: i64,
}

impl From<&UnconfirmedVersionExport> for UnconfirmedDatasetVersionExportDto {
    fn from(row: &UnconfirmedVersionExport) -> Self {
        Self {
            dataset_nbn: row.dataset_nbn.clone(),
            storage_root: row.ocfl_storage_root.clone(),
            bag_id: row.bag_id,
            ocfl_object_version_number: row.ocfl_object_version_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcflObjectVersionDto {
    pub bag_id: String,
    pub object_version: i64,
    #[serde(default)]
    pub nbn: Option<String>,
    #[serde(default)]
    pub data_supplier: Option<String>,
    #[serde(default)]
    pub dataverse_pid: Option<String>,
    #[serde(default)]
    pub dataverse_pid_version: Option<String>,
    #[serde(default)]
    pub other_id: Option<String>,
    #[serde(default)]
    pub other_id_version: Option<String>,
    #[serde(default)]
    pub sword_token: Option<String>,
    #[serde(default)]
    pub ocfl_object_path: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub export_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub skeleton_record: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated: Option<OffsetDateTime>,
    #[serde(default)]
    pub tar_id: Option<Uuid>,
}

impl From<&OcflObjectVersion> for OcflObjectVersionDto {
    fn from(version: &OcflObjectVersion) -> Self {
        Self {
            bag_id: version.bag_id.clone(),
            object_version: version.object_version,
            nbn: version.nbn.clone(),
            data_supplier: version.data_supplier.clone(),
            dataverse_pid: version.dataverse_pid.clone(),
            dataverse_pid_version: version.dataverse_pid_version.clone(),
            other_id: version.other_id.clone(),
            other_id_version: version.other_id_version.clone(),
            sword_token: version.sword_token.clone(),
            ocfl_object_path: version.ocfl_object_path.clone(),
            metadata: metadata_to_value(&version.metadata),
            export_timestamp: version.export_timestamp,
            skeleton_record: version.skeleton_record,
            created: version.created,
            updated: version.updated,
            tar_id: version.tar_id.map(Uuid::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcflObjectVersionParametersDto {
    #[serde(default)]
    pub nbn: Option<String>,
    #[serde(default)]
    pub data_supplier: Option<String>,
    #[serde(default)]
    pub dataverse_pid: Option<String>,
    #[serde(default)]
    pub dataverse_pid_version: Option<String>,
    #[serde(default)]
    pub other_id: Option<String>,
    #[serde(default)]
    pub other_id_version: Option<String>,
    #[serde(default)]
    pub sword_token: Option<String>,
    #[serde(default)]
    pub ocfl_object_path: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub export_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub skeleton_record: bool,
}

impl OcflObjectVersionParametersDto {
    pub fn to_record(&self) -> ObjectVersionRecord {
        ObjectVersionRecord {
            nbn: self.nbn.clone(),
            data_supplier: self.data_supplier.clone(),
            dataverse_pid: self.dataverse_pid.clone(),
            dataverse_pid_version: self.dataverse_pid_version.clone(),
            other_id: self.other_id.clone(),
            other_id_version: self.other_id_version.clone(),
            sword_token: self.sword_token.clone(),
            ocfl_object_path: self.ocfl_object_path.clone(),
            metadata: metadata_to_string(&self.metadata),
            export_timestamp: self.export_timestamp,
            skeleton_record: self.skeleton_record,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcflObjectVersionRefDto {
    pub bag_id: String,
    pub object_version: i64,
}

impl From<&OcflObjectVersionRefDto> for OcflObjectVersionRef {
    fn from(dto: &OcflObjectVersionRefDto) -> Self {
        Self {
            bag_id: dto.bag_id.clone(),
            object_version: dto.object_version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarParameterDto {
    #[serde(default)]
    pub tar_uuid: Option<Uuid>,
    pub vault_path: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub archival_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub tar_parts: Vec<TarPartDto>,
    #[serde(default)]
    pub ocfl_object_versions: Vec<OcflObjectVersionRefDto>,
}

impl TarParameterDto {
    pub fn to_record(&self) -> TarRecord {
        TarRecord {
            vault_path: self.vault_path.clone(),
            archival_timestamp: self.archival_timestamp,
            parts: self.tar_parts.iter().map(TarPartDto::to_record).collect(),
        }
    }

    pub fn member_refs(&self) -> Vec<OcflObjectVersionRef> {
        self.ocfl_object_versions
            .iter()
            .map(OcflObjectVersionRef::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarPartDto {
    pub part_name: String,
    #[serde(default)]
    pub checksum_algorithm: Option<String>,
    #[serde(default)]
    pub checksum_value: Option<String>,
    #[serde(default)]
    pub part_size: Option<i64>,
}

impl TarPartDto {
    fn to_record(&self) -> TarPartRecord {
        TarPartRecord {
            part_name: self.part_name.clone(),
            checksum_algorithm: self.checksum_algorithm.clone(),
            checksum_value: self.checksum_value.clone(),
            part_size: self.part_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarDto {
    pub tar_uuid: Uuid,
    pub vault_path: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub archival_timestamp: Option<OffsetDateTime>,
    pub tar_parts: Vec<TarPartDto>,
    pub ocfl_object_versions: Vec<OcflObjectVersionDto>,
}

impl From<&TarDetail> for TarDto {
    fn from(detail: &TarDetail) -> Self {
        Self {
            tar_uuid: Uuid::from(detail.tar.tar_uuid),
            vault_path: detail.tar.vault_path.clone(),
            archival_timestamp: detail.tar.archival_timestamp,
            tar_parts: detail
                .parts
                .iter()
                .map(|p| TarPartDto {
                    part_name: p.part_name.clone(),
                    checksum_algorithm: p.checksum_algorithm.clone(),
                    checksum_value: p.checksum_value.clone(),
                    part_size: p.part_size,
                })
                .collect(),
            ocfl_object_versions: detail
                .members
                .iter()
                .map(OcflObjectVersionDto::from)
                .collect(),
        }
    }
}

fn metadata_to_string(metadata: &Option<serde_json::Value>) -> Option<String> {
    metadata.as_ref().map(|v| v.to_string())
}

fn metadata_to_value(metadata: &Option<String>) -> Option<serde_json::Value> {
    metadata.as_ref().map(|s| {
        serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.clone()))
    })
}
