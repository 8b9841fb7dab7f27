//! Object version store: archived OCFL object versions and their tar
//! membership.

use sqlx::SqliteConnection;
use time::OffsetDateTime;

use super::models::{OcflObjectVersion, OcflObjectVersionRef};
use super::types::TarId;

/// Descriptive fields of an object version, as supplied by the PUT surface.
#[derive(Debug, Clone, Default)]
pub struct ObjectVersionRecord {
    pub nbn: Option<String>,
    pub data_supplier: Option<String>,
    pub dataverse_pid: Option<String>,
    pub dataverse_pid_version: Option<String>,
    pub other_id: Option<String>,
    pub other_id_version: Option<String>,
    pub sword_token: Option<String>,
    pub ocfl_object_path: Option<String>,
    pub metadata: Option<String>,
    pub export_timestamp: Option<OffsetDateTime>,
    pub skeleton_record: bool,
}

const COLUMNS: &str = "id, bag_id, object_version, nbn, data_supplier, dataverse_pid, \
     dataverse_pid_version, other_id, other_id_version, sword_token, ocfl_object_path, \
     metadata, export_timestamp, skeleton_record, created, updated, tar_id";

pub async fn find_by_bag_id_and_version(
    conn: &mut SqliteConnection,
    bag_id: &str,
    object_version: i64,
) -> Result<Option<OcflObjectVersion>, sqlx::Error> {
    sqlx::query_as::<_, OcflObjectVersion>(&format!(
        "SELECT {COLUMNS} FROM ocfl_object_version WHERE bag_id = ?1 AND object_version = ?2"
    ))
    .bind(bag_id)
    .bind(object_version)
    .fetch_optional(conn)
    .await
}

pub async fn find_all_by_bag_id(
    conn: &mut SqliteConnection,
    bag_id: &str,
) -> Result<Vec<OcflObjectVersion>, sqlx::Error> {
    sqlx::query_as::<_, OcflObjectVersion>(&format!(
        "SELECT {COLUMNS} FROM ocfl_object_version \
         WHERE bag_id = ?1 ORDER BY object_version DESC"
    ))
    .bind(bag_id)
    .fetch_all(conn)
    .await
}

pub async fn find_all_by_sword_token(
    conn: &mut SqliteConnection,
    sword_token: &str,
) -> Result<Vec<OcflObjectVersion>, sqlx::Error> {
    sqlx::query_as::<_, OcflObjectVersion>(&format!(
        "SELECT {COLUMNS} FROM ocfl_object_version \
         WHERE sword_token = ?1 ORDER BY object_version DESC"
    ))
    .bind(sword_token)
    .fetch_all(conn)
    .await
}

/// All object versions registered under an NBN. An empty result is a valid
/// outcome here; the engine decides whether that is an error.
pub async fn find_by_nbn(
    conn: &mut SqliteConnection,
    nbn: &str,
) -> Result<Vec<OcflObjectVersion>, sqlx::Error> {
    sqlx::query_as::<_, OcflObjectVersion>(&format!(
        "SELECT {COLUMNS} FROM ocfl_object_version WHERE nbn = ?1 ORDER BY object_version DESC"
    ))
    .bind(nbn)
    .fetch_all(conn)
    .await
}

/// Resolve a batch of references, failing on the first one that does not
/// exist. Tar operations accept no partial resolution.
pub async fn find_all(
    conn: &mut SqliteConnection,
    refs: &[OcflObjectVersionRef],
) -> Result<Vec<OcflObjectVersion>, FindAllError> {
    let mut versions = Vec::with_capacity(refs.len());
    for r in refs {
        let version = find_by_bag_id_and_version(conn, &r.bag_id, r.object_version)
            .await
            .map_err(FindAllError::Database)?
            .ok_or_else(|| FindAllError::Missing(r.clone()))?;
        versions.push(version);
    }
    Ok(versions)
}

pub async fn list_tar_members(
    conn: &mut SqliteConnection,
    tar_id: TarId,
) -> Result<Vec<OcflObjectVersion>, sqlx::Error> {
    sqlx::query_as::<_, OcflObjectVersion>(&format!(
        "SELECT {COLUMNS} FROM ocfl_object_version \
         WHERE tar_id = ?1 ORDER BY bag_id, object_version"
    ))
    .bind(tar_id)
    .fetch_all(conn)
    .await
}

/// Upsert keyed by `(bag_id, object_version)`.
///
/// A prior record keeps its surrogate id, `created` timestamp, and tar
/// membership; `updated` is refreshed. A fresh record gets `created` stamped.
pub async fn save(
    conn: &mut SqliteConnection,
    bag_id: &str,
    object_version: i64,
    record: &ObjectVersionRecord,
) -> Result<OcflObjectVersion, sqlx::Error> {
    let now = OffsetDateTime::now_utc();

    let existing = find_by_bag_id_and_version(&mut *conn, bag_id, object_version).await?;
    match existing {
        Some(existing) => {
            sqlx::query(
                "UPDATE ocfl_object_version SET nbn = ?1, data_supplier = ?2, \
                 dataverse_pid = ?3, dataverse_pid_version = ?4, other_id = ?5, \
                 other_id_version = ?6, sword_token = ?7, ocfl_object_path = ?8, \
                 metadata = ?9, export_timestamp = ?10, skeleton_record = ?11, \
                 updated = ?12 WHERE id = ?13",
            )
            .bind(&record.nbn)
            .bind(&record.data_supplier)
            .bind(&record.dataverse_pid)
            .bind(&record.dataverse_pid_version)
            .bind(&record.other_id)
            .bind(&record.other_id_version)
            .bind(&record.sword_token)
            .bind(&record.ocfl_object_path)
            .bind(&record.metadata)
            .bind(record.export_timestamp)
            .bind(record.skeleton_record)
            .bind(now)
            .bind(existing.id)
            .execute(&mut *conn)
            .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO ocfl_object_version (bag_id, object_version, nbn, \
                 data_supplier, dataverse_pid, dataverse_pid_version, other_id, \
                 other_id_version, sword_token, ocfl_object_path, metadata, \
                 export_timestamp, skeleton_record, created) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )
            .bind(bag_id)
            .bind(object_version)
            .bind(&record.nbn)
            .bind(&record.data_supplier)
            .bind(&record.dataverse_pid)
            .bind(&record.dataverse_pid_version)
            .bind(&record.other_id)
            .bind(&record.other_id_version)
            .bind(&record.sword_token)
            .bind(&record.ocfl_object_path)
            .bind(&record.metadata)
            .bind(record.export_timestamp)
            .bind(record.skeleton_record)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }
    }

    // Re-read so the caller sees exactly what was stored.
    find_by_bag_id_and_version(conn, bag_id, object_version)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Claim an object version for a tar.
///
/// The WHERE guard makes the write a no-op when another tar already holds
/// the version, so the storage layer, not the pre-check, is the final
/// arbiter under concurrency. Returns whether the claim took effect.
pub async fn claim_for_tar(
    conn: &mut SqliteConnection,
    object_version_id: i64,
    tar_id: TarId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE ocfl_object_version SET tar_id = ?1, updated = ?2 \
         WHERE id = ?3 AND (tar_id IS NULL OR tar_id = ?1)",
    )
    .bind(tar_id)
    .bind(OffsetDateTime::now_utc())
    .bind(object_version_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Release every member of a tar that is not part of the new membership set.
pub async fn release_members_except(
    conn: &mut SqliteConnection,
    tar_id: TarId,
    keep_ids: &[i64],
) -> Result<(), sqlx::Error> {
    let members = list_tar_members(&mut *conn, tar_id).await?;
    for member in members {
        if keep_ids.contains(&member.id) {
            continue;
        }
        sqlx::query("UPDATE ocfl_object_version SET tar_id = NULL, updated = ?1 WHERE id = ?2")
            .bind(OffsetDateTime::now_utc())
            .bind(member.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum FindAllError {
    #[error("ocfl object version {0} not found")]
    Missing(OcflObjectVersionRef),

    #[error(transparent)]
    Database(sqlx::Error),
}
