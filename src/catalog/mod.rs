//! The consistency engine.
//!
//! `Catalog` is the only component allowed to mutate cross-entity
//! relationships. It enforces two invariants before delegating single-entity
//! writes to the stores:
//!
//! - version export numbers per dataset are contiguous and monotonic;
//! - an OCFL object version belongs to at most one tar, ever.
//!
//! Every mutating operation runs inside one sqlx transaction (the unit of
//! work). A typed failure returns before commit, so the dropped transaction
//! rolls everything back and no partial write is observable.

mod error;

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::dataset_queries::{self, NewDataset, VersionExportRecord};
use crate::database::models::{
    Dataset, DatasetVersionExport, FileMeta, OcflObjectVersion, OcflObjectVersionRef, Tar, TarPart,
    UnconfirmedVersionExport,
};
use crate::database::object_queries::{self, ObjectVersionRecord};
use crate::database::tar_queries::{self, TarRecord};
use crate::database::types::{TarId, UrnUuid};
use crate::database::Database;
use crate::search_index::SearchIndex;

pub use error::CatalogError;

/// A dataset together with its ordered exports and their file metadata.
#[derive(Debug, Clone)]
pub struct DatasetDetail {
    pub dataset: Dataset,
    pub exports: Vec<ExportDetail>,
}

#[derive(Debug, Clone)]
pub struct ExportDetail {
    pub export: DatasetVersionExport,
    pub file_metas: Vec<FileMeta>,
}

/// A tar together with its parts and member object versions.
#[derive(Debug, Clone)]
pub struct TarDetail {
    pub tar: Tar,
    pub parts: Vec<TarPart>,
    pub members: Vec<OcflObjectVersion>,
}

#[derive(Clone)]
pub struct Catalog {
    db: Database,
    search_index: Option<Arc<dyn SearchIndex>>,
}

impl Catalog {
    pub fn new(db: Database, search_index: Option<Arc<dyn SearchIndex>>) -> Self {
        Self { db, search_index }
    }

    // ---- version export operations ----

    /// Register a new dataset with zero exports.
    pub async fn register_dataset(&self, new: &NewDataset) -> Result<Dataset, CatalogError> {
        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;

        if dataset_queries::find_dataset_by_nbn(&mut tx, &new.nbn)
            .await
            .map_err(CatalogError::from)?
            .is_some()
        {
            return Err(CatalogError::AlreadyExists(format!(
                "dataset {}",
                new.nbn
            )));
        }

        let dataset = dataset_queries::insert_dataset(&mut tx, new)
            .await
            .map_err(CatalogError::from)?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(nbn = %dataset.nbn, "registered dataset");
        self.notify_search_index(&dataset.nbn).await;
        Ok(dataset)
    }

    /// Append the next version export, or amend the current latest in place.
    ///
    /// The requested number must be the current maximum (amend, skeleton
    /// records only) or exactly one past it (append); anything else is an
    /// `InvalidSequence` failure, so stored numbers are always `{1, ..., N}`.
    pub async fn append_or_amend_version_export(
        &self,
        nbn: &str,
        version_number: i64,
        record: &VersionExportRecord,
    ) -> Result<ExportDetail, CatalogError> {
        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;

        let dataset = dataset_queries::find_dataset_by_nbn(&mut tx, nbn)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("dataset {nbn}")))?;

        let latest = dataset_queries::max_version_number(&mut tx, dataset.id)
            .await
            .map_err(CatalogError::from)?;

        let export = if version_number == latest && latest > 0 {
            let existing = dataset_queries::find_version_export(&mut tx, dataset.id, version_number)
                .await
                .map_err(CatalogError::from)?
                .ok_or_else(|| {
                    CatalogError::NotFound(format!("version export {nbn} v{version_number}"))
                })?;

            if !existing.skeleton_record {
                return Err(CatalogError::Conflict(format!(
                    "version export {nbn} v{version_number} is not a skeleton record and cannot be amended"
                )));
            }

            dataset_queries::update_version_export(&mut tx, existing.id, record)
                .await
                .map_err(CatalogError::from)?;

            dataset_queries::find_version_export(&mut tx, dataset.id, version_number)
                .await
                .map_err(CatalogError::from)?
                .ok_or_else(|| {
                    CatalogError::NotFound(format!("version export {nbn} v{version_number}"))
                })?
        } else if version_number == latest + 1 {
            dataset_queries::insert_version_export(&mut tx, dataset.id, version_number, record)
                .await
                .map_err(CatalogError::from)?
        } else {
            return Err(CatalogError::InvalidSequence(format!(
                "version number {version_number} for dataset {nbn} must be the latest ({latest}) or one past it"
            )));
        };

        let file_metas = dataset_queries::list_file_metas(&mut tx, export.id)
            .await
            .map_err(CatalogError::from)?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(
            nbn,
            version = version_number,
            bag_id = %export.bag_id,
            "stored version export"
        );
        self.notify_search_index(nbn).await;
        Ok(ExportDetail { export, file_metas })
    }

    /// Confirm archival of one export. A one-time transition: a second
    /// attempt fails with `Conflict` and the first timestamp stands.
    pub async fn set_archived_timestamp(
        &self,
        nbn: &str,
        version_number: i64,
        archived_timestamp: OffsetDateTime,
    ) -> Result<(), CatalogError> {
        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;

        let dataset = dataset_queries::find_dataset_by_nbn(&mut tx, nbn)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("dataset {nbn}")))?;

        let export = dataset_queries::find_version_export(&mut tx, dataset.id, version_number)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("version export {nbn} v{version_number}"))
            })?;

        if export.archived_timestamp.is_some() {
            return Err(CatalogError::Conflict(format!(
                "archived timestamp for {nbn} v{version_number} is already set"
            )));
        }

        dataset_queries::set_archived_timestamp(&mut tx, export.id, archived_timestamp)
            .await
            .map_err(CatalogError::from)?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(nbn, version = version_number, "confirmed archival");
        Ok(())
    }

    /// Fetch a dataset with all its exports.
    pub async fn find_dataset(&self, nbn: &str) -> Result<DatasetDetail, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let dataset = dataset_queries::find_dataset_by_nbn(&mut conn, nbn)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("dataset {nbn}")))?;
        self.load_dataset_detail(&mut conn, dataset).await
    }

    pub async fn find_dataset_by_sword_token(
        &self,
        sword_token: &str,
    ) -> Result<DatasetDetail, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let dataset = dataset_queries::find_dataset_by_sword_token(&mut conn, sword_token)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("dataset with sword token {sword_token}"))
            })?;
        self.load_dataset_detail(&mut conn, dataset).await
    }

    pub async fn find_version_export(
        &self,
        nbn: &str,
        version_number: i64,
    ) -> Result<ExportDetail, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let dataset = dataset_queries::find_dataset_by_nbn(&mut conn, nbn)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("dataset {nbn}")))?;
        let export = dataset_queries::find_version_export(&mut conn, dataset.id, version_number)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("version export {nbn} v{version_number}"))
            })?;
        let file_metas = dataset_queries::list_file_metas(&mut conn, export.id)
            .await
            .map_err(CatalogError::from)?;
        Ok(ExportDetail { export, file_metas })
    }

    /// Fetch one export by its globally unique bag id, with the owning
    /// dataset for context.
    pub async fn find_version_export_by_bag_id(
        &self,
        bag_id: &UrnUuid,
    ) -> Result<(Dataset, ExportDetail), CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let export = dataset_queries::find_version_export_by_bag_id(&mut conn, bag_id)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("version export with bag id {bag_id}")))?;
        let dataset = dataset_queries::find_dataset_by_id(&mut conn, export.dataset_id)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("dataset owning bag id {bag_id}"))
            })?;
        let file_metas = dataset_queries::list_file_metas(&mut conn, export.id)
            .await
            .map_err(CatalogError::from)?;
        Ok((dataset, ExportDetail { export, file_metas }))
    }

    /// Exports still awaiting archival confirmation; may be immediately
    /// stale under concurrent writers and is not a strict queue.
    pub async fn list_unconfirmed(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UnconfirmedVersionExport>, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        dataset_queries::list_unconfirmed(&mut conn, limit, offset)
            .await
            .map_err(CatalogError::from)
    }

    // ---- ocfl object version operations ----

    /// Create-or-replace an object version keyed by `(bag_id, version)`,
    /// giving the external PUT surface its idempotent semantics.
    pub async fn save_object_version(
        &self,
        r: &OcflObjectVersionRef,
        record: &ObjectVersionRecord,
    ) -> Result<OcflObjectVersion, CatalogError> {
        let _: UrnUuid = r.bag_id.parse()?;

        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;
        let stored = object_queries::save(&mut tx, &r.bag_id, r.object_version, record)
            .await
            .map_err(CatalogError::from)?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(bag_id = %r.bag_id, version = r.object_version, "stored ocfl object version");
        Ok(stored)
    }

    pub async fn find_object_version(
        &self,
        bag_id: &str,
        object_version: i64,
    ) -> Result<OcflObjectVersion, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        object_queries::find_by_bag_id_and_version(&mut conn, bag_id, object_version)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "ocfl object version {bag_id} version {object_version}"
                ))
            })
    }

    pub async fn find_object_versions_by_bag_id(
        &self,
        bag_id: &str,
    ) -> Result<Vec<OcflObjectVersion>, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        object_queries::find_all_by_bag_id(&mut conn, bag_id)
            .await
            .map_err(CatalogError::from)
    }

    pub async fn find_object_versions_by_sword_token(
        &self,
        sword_token: &str,
    ) -> Result<Vec<OcflObjectVersion>, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        object_queries::find_all_by_sword_token(&mut conn, sword_token)
            .await
            .map_err(CatalogError::from)
    }

    /// Object versions under an NBN; an empty result is reported as
    /// `NotFound` at this boundary.
    pub async fn find_object_versions_by_nbn(
        &self,
        nbn: &str,
    ) -> Result<Vec<OcflObjectVersion>, CatalogError> {
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let versions = object_queries::find_by_nbn(&mut conn, nbn)
            .await
            .map_err(CatalogError::from)?;

        if versions.is_empty() {
            return Err(CatalogError::NotFound(format!(
                "no ocfl object versions found for NBN {nbn}"
            )));
        }
        Ok(versions)
    }

    // ---- tar operations ----

    /// Seal a new tar over the referenced object versions.
    ///
    /// All membership checks run before any write; a rejection leaves the
    /// tar and every object version untouched.
    pub async fn create_tar(
        &self,
        tar_id: Uuid,
        record: &TarRecord,
        members: &[OcflObjectVersionRef],
    ) -> Result<TarDetail, CatalogError> {
        let tar_id = TarId::from(tar_id);
        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;

        if tar_queries::find_by_id(&mut tx, tar_id)
            .await
            .map_err(CatalogError::from)?
            .is_some()
        {
            return Err(CatalogError::AlreadyExists(format!("tar {tar_id}")));
        }

        let resolved = object_queries::find_all(&mut tx, members)
            .await
            .map_err(CatalogError::from)?;
        Self::check_memberships(&resolved, tar_id)?;

        let tar = tar_queries::insert(&mut tx, tar_id, record)
            .await
            .map_err(CatalogError::from)?;
        Self::claim_members(&mut tx, &resolved, tar_id).await?;

        let detail = Self::load_tar_detail(&mut tx, tar).await?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(tar = %tar_id, members = resolved.len(), "created tar");
        Ok(detail)
    }

    /// Replace a tar's parts, membership, vault path, and archival
    /// timestamp. Re-assigning a version the tar already holds is a no-op.
    pub async fn update_tar(
        &self,
        tar_id: Uuid,
        record: &TarRecord,
        members: &[OcflObjectVersionRef],
    ) -> Result<TarDetail, CatalogError> {
        let tar_id = TarId::from(tar_id);
        let mut tx = self.db.begin().await.map_err(CatalogError::from)?;

        if tar_queries::find_by_id(&mut tx, tar_id)
            .await
            .map_err(CatalogError::from)?
            .is_none()
        {
            return Err(CatalogError::NotFound(format!("tar {tar_id}")));
        }

        let resolved = object_queries::find_all(&mut tx, members)
            .await
            .map_err(CatalogError::from)?;
        Self::check_memberships(&resolved, tar_id)?;

        let tar = tar_queries::update(&mut tx, tar_id, record)
            .await
            .map_err(CatalogError::from)?;

        let keep_ids: Vec<i64> = resolved.iter().map(|v| v.id).collect();
        object_queries::release_members_except(&mut tx, tar_id, &keep_ids)
            .await
            .map_err(CatalogError::from)?;
        Self::claim_members(&mut tx, &resolved, tar_id).await?;

        let detail = Self::load_tar_detail(&mut tx, tar).await?;
        tx.commit().await.map_err(CatalogError::from)?;

        tracing::info!(tar = %tar_id, members = resolved.len(), "updated tar");
        Ok(detail)
    }

    pub async fn find_tar(&self, tar_id: Uuid) -> Result<TarDetail, CatalogError> {
        let tar_id = TarId::from(tar_id);
        let mut conn = self.db.acquire().await.map_err(CatalogError::from)?;
        let tar = tar_queries::find_by_id(&mut conn, tar_id)
            .await
            .map_err(CatalogError::from)?
            .ok_or_else(|| CatalogError::NotFound(format!("tar {tar_id}")))?;
        Self::load_tar_detail(&mut conn, tar).await
    }

    // ---- internals ----

    /// Check-all-before-write-all: reject if any resolved version already
    /// belongs to a different tar. Belonging to `tar_id` itself is fine
    /// (idempotent re-submission during an update).
    fn check_memberships(
        resolved: &[OcflObjectVersion],
        tar_id: TarId,
    ) -> Result<(), CatalogError> {
        for version in resolved {
            if let Some(holder) = version.tar_id {
                if holder != tar_id {
                    return Err(CatalogError::AlreadyInContainer {
                        tar_id: holder.to_string(),
                        detail: format!(
                            "ocfl object version {} version {}",
                            version.bag_id, version.object_version
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// The pre-check above is an optimization; the guarded UPDATE is the
    /// source of truth when a concurrent unit of work claimed a version
    /// between our read and our write.
    async fn claim_members(
        conn: &mut sqlx::SqliteConnection,
        resolved: &[OcflObjectVersion],
        tar_id: TarId,
    ) -> Result<(), CatalogError> {
        for version in resolved {
            let claimed = object_queries::claim_for_tar(&mut *conn, version.id, tar_id)
                .await
                .map_err(CatalogError::from)?;
            if !claimed {
                let holder =
                    object_queries::find_by_bag_id_and_version(
                        &mut *conn,
                        &version.bag_id,
                        version.object_version,
                    )
                    .await
                    .map_err(CatalogError::from)?
                    .and_then(|v| v.tar_id)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                return Err(CatalogError::AlreadyInContainer {
                    tar_id: holder,
                    detail: format!(
                        "ocfl object version {} version {}",
                        version.bag_id, version.object_version
                    ),
                });
            }
        }
        Ok(())
    }

    async fn load_dataset_detail(
        &self,
        conn: &mut sqlx::SqliteConnection,
        dataset: Dataset,
    ) -> Result<DatasetDetail, CatalogError> {
        let exports = dataset_queries::list_version_exports(&mut *conn, dataset.id)
            .await
            .map_err(CatalogError::from)?;

        let mut details = Vec::with_capacity(exports.len());
        for export in exports {
            let file_metas = dataset_queries::list_file_metas(&mut *conn, export.id)
                .await
                .map_err(CatalogError::from)?;
            details.push(ExportDetail { export, file_metas });
        }

        Ok(DatasetDetail {
            dataset,
            exports: details,
        })
    }

    async fn load_tar_detail(
        conn: &mut sqlx::SqliteConnection,
        tar: Tar,
    ) -> Result<TarDetail, CatalogError> {
        let parts = tar_queries::list_parts(&mut *conn, tar.tar_uuid)
            .await
            .map_err(CatalogError::from)?;
        let members = object_queries::list_tar_members(&mut *conn, tar.tar_uuid)
            .await
            .map_err(CatalogError::from)?;
        Ok(TarDetail {
            tar,
            parts,
            members,
        })
    }

    /// Core behavior never depends on the notifier's presence or success.
    async fn notify_search_index(&self, nbn: &str) {
        if let Some(search_index) = &self.search_index {
            if let Err(e) = search_index.index_dataset(nbn).await {
                tracing::warn!(nbn, "search index notification failed: {e}");
            }
        }
    }
}
