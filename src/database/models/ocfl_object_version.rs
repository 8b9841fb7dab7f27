use time::OffsetDateTime;

use crate::database::types::TarId;

/// One archived OCFL object version, keyed by `(bag_id, object_version)`.
///
/// `tar_id` points at the tar currently holding this version, if any. It is
/// set at most once; reassignment to a different tar is a consistency
/// violation enforced by the catalog engine and the guarded claim query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OcflObjectVersion {
    pub id: i64,
    pub bag_id: String,
    pub object_version: i64,
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
    pub created: OffsetDateTime,
    pub updated: Option<OffsetDateTime>,
    pub tar_id: Option<TarId>,
}

/// Reference to an object version as supplied by tar operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OcflObjectVersionRef {
    pub bag_id: String,
    pub object_version: i64,
}

impl std::fmt::Display for OcflObjectVersionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} version {}", self.bag_id, self.object_version)
    }
}
