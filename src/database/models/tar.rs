use time::OffsetDateTime;

use crate::database::types::TarId;

/// A sealed cold-storage container holding one or more OCFL object versions.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tar {
    pub tar_uuid: TarId,
    pub vault_path: String,
    pub archival_timestamp: Option<OffsetDateTime>,
}

/// One physical part of a tar as written to the vault.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TarPart {
    pub id: i64,
    pub tar_uuid: TarId,
    pub part_name: String,
    pub checksum_algorithm: Option<String>,
    pub checksum_value: Option<String>,
    pub part_size: Option<i64>,
}
