use crate::database::object_queries::FindAllError;
use crate::database::types::UrnUuidError;

/// Typed failure taxonomy of the catalog engine.
///
/// Every operation recovers storage failures at this boundary; nothing
/// unwinds past the unit of work (the dropped transaction rolls back).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid version sequence: {0}")]
    InvalidSequence(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{detail} already belongs to tar {tar_id}")]
    AlreadyInContainer { tar_id: String, detail: String },

    #[error("malformed bag id: {0}")]
    MalformedBagId(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Pre-checks cannot fully close races between concurrent units of work, so
/// a uniqueness violation surfacing from SQLite is mapped onto the same
/// taxonomy as the pre-check path, by constraint.
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                let message = db_err.message().to_string();
                return translate_unique_violation(message, err);
            }
        }
        CatalogError::Database(err)
    }
}

// SQLite reports unique violations as
// "UNIQUE constraint failed: <table>.<column>[, ...]".
fn translate_unique_violation(message: String, err: sqlx::Error) -> CatalogError {
    if message.contains("dataset.nbn") {
        CatalogError::AlreadyExists(message)
    } else if message.contains("dataset_version_export.bag_id")
        || message.contains("ocfl_object_version.bag_id")
        || message.contains("tar.tar_uuid")
    {
        CatalogError::AlreadyExists(message)
    } else if message.contains("dataset_version_export.dataset_id") {
        // A concurrent writer appended this version number first.
        CatalogError::InvalidSequence(message)
    } else if message.contains("file_meta.") {
        CatalogError::Conflict(message)
    } else {
        CatalogError::Database(err)
    }
}

impl From<UrnUuidError> for CatalogError {
    fn from(err: UrnUuidError) -> Self {
        CatalogError::MalformedBagId(err.to_string())
    }
}

impl From<FindAllError> for CatalogError {
    fn from(err: FindAllError) -> Self {
        match err {
            FindAllError::Missing(r) => CatalogError::NotFound(format!("ocfl object version {r}")),
            FindAllError::Database(e) => e.into(),
        }
    }
}
