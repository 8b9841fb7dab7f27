//! Version export store: datasets, their exports, and file metadata.
//!
//! Every function takes a live connection so callers can compose them inside
//! one transaction. Cascades (file metas living and dying with their export)
//! are handled here, not by the engine.

use sqlx::SqliteConnection;
use time::OffsetDateTime;

use super::models::{
    normalize_title, Dataset, DatasetVersionExport, FileMeta, UnconfirmedVersionExport,
};
use super::types::UrnUuid;

/// Dataset columns without the surrogate id, for insertion.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub nbn: String,
    pub ocfl_storage_root: String,
    pub data_supplier: Option<String>,
    pub sword_token: Option<String>,
    pub dataverse_pid: Option<String>,
}

/// Mutable fields of a version export, as supplied by append and amend.
#[derive(Debug, Clone)]
pub struct VersionExportRecord {
    pub bag_id: UrnUuid,
    pub title: Option<String>,
    pub dataverse_pid_version: Option<String>,
    pub other_id: Option<String>,
    pub other_id_version: Option<String>,
    pub metadata: Option<String>,
    pub deaccessioned: bool,
    pub exporter: Option<String>,
    pub exporter_version: Option<String>,
    pub skeleton_record: bool,
    pub file_metas: Vec<FileMetaRecord>,
}

#[derive(Debug, Clone)]
pub struct FileMetaRecord {
    pub filepath: String,
    pub file_uri: String,
    pub byte_size: i64,
    pub sha1sum: String,
}

const DATASET_COLUMNS: &str = "id, nbn, ocfl_storage_root, data_supplier, sword_token, dataverse_pid";

const EXPORT_COLUMNS: &str = "id, dataset_id, bag_id, ocfl_object_version_number, \
     created_timestamp, archived_timestamp, title, dataverse_pid_version, other_id, \
     other_id_version, metadata, deaccessioned, exporter, exporter_version, skeleton_record";

pub async fn find_dataset_by_nbn(
    conn: &mut SqliteConnection,
    nbn: &str,
) -> Result<Option<Dataset>, sqlx::Error> {
    sqlx::query_as::<_, Dataset>(&format!(
        "SELECT {DATASET_COLUMNS} FROM dataset WHERE nbn = ?1"
    ))
    .bind(nbn)
    .fetch_optional(conn)
    .await
}

pub async fn find_dataset_by_sword_token(
    conn: &mut SqliteConnection,
    sword_token: &str,
) -> Result<Option<Dataset>, sqlx::Error> {
    sqlx::query_as::<_, Dataset>(&format!(
        "SELECT {DATASET_COLUMNS} FROM dataset WHERE sword_token = ?1"
    ))
    .bind(sword_token)
    .fetch_optional(conn)
    .await
}

pub async fn find_dataset_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Dataset>, sqlx::Error> {
    sqlx::query_as::<_, Dataset>(&format!(
        "SELECT {DATASET_COLUMNS} FROM dataset WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn insert_dataset(
    conn: &mut SqliteConnection,
    new: &NewDataset,
) -> Result<Dataset, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dataset (nbn, ocfl_storage_root, data_supplier, sword_token, dataverse_pid) \
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(&new.nbn)
    .bind(&new.ocfl_storage_root)
    .bind(&new.data_supplier)
    .bind(&new.sword_token)
    .bind(&new.dataverse_pid)
    .fetch_one(conn)
    .await?;

    Ok(Dataset {
        id,
        nbn: new.nbn.clone(),
        ocfl_storage_root: new.ocfl_storage_root.clone(),
        data_supplier: new.data_supplier.clone(),
        sword_token: new.sword_token.clone(),
        dataverse_pid: new.dataverse_pid.clone(),
    })
}

pub async fn list_version_exports(
    conn: &mut SqliteConnection,
    dataset_id: i64,
) -> Result<Vec<DatasetVersionExport>, sqlx::Error> {
    sqlx::query_as::<_, DatasetVersionExport>(&format!(
        "SELECT {EXPORT_COLUMNS} FROM dataset_version_export \
         WHERE dataset_id = ?1 ORDER BY ocfl_object_version_number"
    ))
    .bind(dataset_id)
    .fetch_all(conn)
    .await
}

pub async fn find_version_export(
    conn: &mut SqliteConnection,
    dataset_id: i64,
    version_number: i64,
) -> Result<Option<DatasetVersionExport>, sqlx::Error> {
    sqlx::query_as::<_, DatasetVersionExport>(&format!(
        "SELECT {EXPORT_COLUMNS} FROM dataset_version_export \
         WHERE dataset_id = ?1 AND ocfl_object_version_number = ?2"
    ))
    .bind(dataset_id)
    .bind(version_number)
    .fetch_optional(conn)
    .await
}

pub async fn find_version_export_by_bag_id(
    conn: &mut SqliteConnection,
    bag_id: &UrnUuid,
) -> Result<Option<DatasetVersionExport>, sqlx::Error> {
    sqlx::query_as::<_, DatasetVersionExport>(&format!(
        "SELECT {EXPORT_COLUMNS} FROM dataset_version_export WHERE bag_id = ?1"
    ))
    .bind(*bag_id)
    .fetch_optional(conn)
    .await
}

/// Highest stored version number for a dataset, 0 when it has no exports.
pub async fn max_version_number(
    conn: &mut SqliteConnection,
    dataset_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COALESCE(MAX(ocfl_object_version_number), 0) \
         FROM dataset_version_export WHERE dataset_id = ?1",
    )
    .bind(dataset_id)
    .fetch_one(conn)
    .await
}

/// Insert a new export and its file metas under the given dataset.
pub async fn insert_version_export(
    conn: &mut SqliteConnection,
    dataset_id: i64,
    version_number: i64,
    record: &VersionExportRecord,
) -> Result<DatasetVersionExport, sqlx::Error> {
    let created = OffsetDateTime::now_utc();
    let title = normalize_title(record.title.clone());

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dataset_version_export (dataset_id, bag_id, \
         ocfl_object_version_number, created_timestamp, title, dataverse_pid_version, \
         other_id, other_id_version, metadata, deaccessioned, exporter, \
         exporter_version, skeleton_record) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) RETURNING id",
    )
    .bind(dataset_id)
    .bind(record.bag_id)
    .bind(version_number)
    .bind(created)
    .bind(&title)
    .bind(&record.dataverse_pid_version)
    .bind(&record.other_id)
    .bind(&record.other_id_version)
    .bind(&record.metadata)
    .bind(record.deaccessioned)
    .bind(&record.exporter)
    .bind(&record.exporter_version)
    .bind(record.skeleton_record)
    .fetch_one(&mut *conn)
    .await?;

    insert_file_metas(conn, id, &record.file_metas).await?;

    Ok(DatasetVersionExport {
        id,
        dataset_id,
        bag_id: record.bag_id,
        ocfl_object_version_number: version_number,
        created_timestamp: created,
        archived_timestamp: None,
        title,
        dataverse_pid_version: record.dataverse_pid_version.clone(),
        other_id: record.other_id.clone(),
        other_id_version: record.other_id_version.clone(),
        metadata: record.metadata.clone(),
        deaccessioned: record.deaccessioned,
        exporter: record.exporter.clone(),
        exporter_version: record.exporter_version.clone(),
        skeleton_record: record.skeleton_record,
    })
}

/// Overwrite the mutable fields of an existing export in place.
///
/// Identity, owning dataset, version number, and created timestamp are
/// preserved; the file meta collection is replaced wholesale.
pub async fn update_version_export(
    conn: &mut SqliteConnection,
    export_id: i64,
    record: &VersionExportRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE dataset_version_export SET bag_id = ?1, title = ?2, \
         dataverse_pid_version = ?3, other_id = ?4, other_id_version = ?5, \
         metadata = ?6, deaccessioned = ?7, exporter = ?8, exporter_version = ?9, \
         skeleton_record = ?10 WHERE id = ?11",
    )
    .bind(record.bag_id)
    .bind(normalize_title(record.title.clone()))
    .bind(&record.dataverse_pid_version)
    .bind(&record.other_id)
    .bind(&record.other_id_version)
    .bind(&record.metadata)
    .bind(record.deaccessioned)
    .bind(&record.exporter)
    .bind(&record.exporter_version)
    .bind(record.skeleton_record)
    .bind(export_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM file_meta WHERE version_export_id = ?1")
        .bind(export_id)
        .execute(&mut *conn)
        .await?;

    insert_file_metas(conn, export_id, &record.file_metas).await
}

pub async fn set_archived_timestamp(
    conn: &mut SqliteConnection,
    export_id: i64,
    archived_timestamp: OffsetDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE dataset_version_export SET archived_timestamp = ?1 WHERE id = ?2")
        .bind(archived_timestamp)
        .bind(export_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list_file_metas(
    conn: &mut SqliteConnection,
    export_id: i64,
) -> Result<Vec<FileMeta>, sqlx::Error> {
    sqlx::query_as::<_, FileMeta>(
        "SELECT id, version_export_id, filepath, file_uri, byte_size, sha1sum \
         FROM file_meta WHERE version_export_id = ?1 ORDER BY filepath",
    )
    .bind(export_id)
    .fetch_all(conn)
    .await
}

/// Exports whose archival has not been confirmed yet, for the external
/// reconciliation process. Ordered by insertion so paging is stable while no
/// writes occur concurrently.
pub async fn list_unconfirmed(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<UnconfirmedVersionExport>, sqlx::Error> {
    sqlx::query_as::<_, UnconfirmedVersionExport>(
        "SELECT d.nbn AS dataset_nbn, d.ocfl_storage_root AS ocfl_storage_root, \
         dve.bag_id AS bag_id, dve.ocfl_object_version_number AS ocfl_object_version_number \
         FROM dataset_version_export dve \
         JOIN dataset d ON d.id = dve.dataset_id \
         WHERE dve.archived_timestamp IS NULL \
         ORDER BY dve.id LIMIT ?1 OFFSET ?2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(conn)
    .await
}

async fn insert_file_metas(
    conn: &mut SqliteConnection,
    export_id: i64,
    file_metas: &[FileMetaRecord],
) -> Result<(), sqlx::Error> {
    for file_meta in file_metas {
        sqlx::query(
            "INSERT INTO file_meta (version_export_id, filepath, file_uri, byte_size, sha1sum) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(export_id)
        .bind(&file_meta.filepath)
        .bind(&file_meta.file_uri)
        .bind(file_meta.byte_size)
        .bind(&file_meta.sha1sum)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
