//! Tar store: sealed containers and their physical parts.

use sqlx::SqliteConnection;
use time::OffsetDateTime;

use super::models::{Tar, TarPart};
use super::types::TarId;

/// Tar columns without identity, for create and update.
#[derive(Debug, Clone)]
pub struct TarRecord {
    pub vault_path: String,
    pub archival_timestamp: Option<OffsetDateTime>,
    pub parts: Vec<TarPartRecord>,
}

#[derive(Debug, Clone)]
pub struct TarPartRecord {
    pub part_name: String,
    pub checksum_algorithm: Option<String>,
    pub checksum_value: Option<String>,
    pub part_size: Option<i64>,
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    tar_id: TarId,
) -> Result<Option<Tar>, sqlx::Error> {
    sqlx::query_as::<_, Tar>(
        "SELECT tar_uuid, vault_path, archival_timestamp FROM tar WHERE tar_uuid = ?1",
    )
    .bind(tar_id)
    .fetch_optional(conn)
    .await
}

pub async fn insert(
    conn: &mut SqliteConnection,
    tar_id: TarId,
    record: &TarRecord,
) -> Result<Tar, sqlx::Error> {
    sqlx::query("INSERT INTO tar (tar_uuid, vault_path, archival_timestamp) VALUES (?1, ?2, ?3)")
        .bind(tar_id)
        .bind(&record.vault_path)
        .bind(record.archival_timestamp)
        .execute(&mut *conn)
        .await?;

    replace_parts(conn, tar_id, &record.parts).await?;

    Ok(Tar {
        tar_uuid: tar_id,
        vault_path: record.vault_path.clone(),
        archival_timestamp: record.archival_timestamp,
    })
}

/// Update the tar row and replace its parts list wholesale.
pub async fn update(
    conn: &mut SqliteConnection,
    tar_id: TarId,
    record: &TarRecord,
) -> Result<Tar, sqlx::Error> {
    sqlx::query("UPDATE tar SET vault_path = ?1, archival_timestamp = ?2 WHERE tar_uuid = ?3")
        .bind(&record.vault_path)
        .bind(record.archival_timestamp)
        .bind(tar_id)
        .execute(&mut *conn)
        .await?;

    replace_parts(conn, tar_id, &record.parts).await?;

    Ok(Tar {
        tar_uuid: tar_id,
        vault_path: record.vault_path.clone(),
        archival_timestamp: record.archival_timestamp,
    })
}

pub async fn list_parts(
    conn: &mut SqliteConnection,
    tar_id: TarId,
) -> Result<Vec<TarPart>, sqlx::Error> {
    sqlx::query_as::<_, TarPart>(
        "SELECT id, tar_uuid, part_name, checksum_algorithm, checksum_value, part_size \
         FROM tar_part WHERE tar_uuid = ?1 ORDER BY id",
    )
    .bind(tar_id)
    .fetch_all(conn)
    .await
}

async fn replace_parts(
    conn: &mut SqliteConnection,
    tar_id: TarId,
    parts: &[TarPartRecord],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tar_part WHERE tar_uuid = ?1")
        .bind(tar_id)
        .execute(&mut *conn)
        .await?;

    for part in parts {
        sqlx::query(
            "INSERT INTO tar_part (tar_uuid, part_name, checksum_algorithm, \
             checksum_value, part_size) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(tar_id)
        .bind(&part.part_name)
        .bind(&part.checksum_algorithm)
        .bind(&part.checksum_value)
        .bind(part.part_size)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
