//! Integration tests for dataset registration and the version export
//! lifecycle: contiguous numbering, skeleton amendment, archival
//! confirmation, and the unconfirmed listing.

mod common;

use time::OffsetDateTime;
use vault_catalog::catalog::CatalogError;

const NBN: &str = "urn:nbn:nl:ui:13-00000000-0000-0000-0000-000000000000";
const BAG_1: &str = "urn:uuid:00000000-0000-0000-0000-000000000001";
const BAG_2: &str = "urn:uuid:00000000-0000-0000-0000-000000000002";
const BAG_3: &str = "urn:uuid:00000000-0000-0000-0000-000000000003";

#[tokio::test]
async fn register_then_fetch_dataset() {
    let catalog = common::setup_catalog().await;

    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    let detail = catalog.find_dataset(NBN).await.unwrap();
    assert_eq!(detail.dataset.nbn, NBN);
    assert_eq!(detail.dataset.ocfl_storage_root, "srd/storage01");
    assert!(detail.exports.is_empty());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let catalog = common::setup_catalog().await;

    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();
    let err = catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyExists(_)));
}

#[tokio::test]
async fn version_numbers_stay_contiguous() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    // v1 appends cleanly.
    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();

    // v3 would leave a gap.
    let err = catalog
        .append_or_amend_version_export(NBN, 3, &common::export_record(BAG_3))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidSequence(_)));

    // v2 is the next number and appends.
    catalog
        .append_or_amend_version_export(NBN, 2, &common::export_record(BAG_2))
        .await
        .unwrap();

    let detail = catalog.find_dataset(NBN).await.unwrap();
    let numbers: Vec<i64> = detail
        .exports
        .iter()
        .map(|e| e.export.ocfl_object_version_number)
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    // v0 and negative numbers are never valid.
    let err = catalog
        .append_or_amend_version_export(NBN, 0, &common::export_record(BAG_3))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidSequence(_)));
}

#[tokio::test]
async fn resubmitting_a_non_latest_version_is_rejected() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();
    catalog
        .append_or_amend_version_export(NBN, 2, &common::export_record(BAG_2))
        .await
        .unwrap();

    // Version 1 exists but is no longer the maximum; only the latest can
    // be targeted, so this is a sequence error, not a skeleton conflict.
    let err = catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidSequence(_)));

    // Both stored exports are untouched.
    let detail = catalog.find_dataset(NBN).await.unwrap();
    let numbers: Vec<i64> = detail
        .exports
        .iter()
        .map(|e| e.export.ocfl_object_version_number)
        .collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn amending_requires_a_skeleton_record() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();

    // The latest export is a full record; amending it is a conflict.
    let err = catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));
}

#[tokio::test]
async fn skeleton_record_is_amended_in_place() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    let skeleton = common::skeleton_export_record(BAG_1);
    let first = catalog
        .append_or_amend_version_export(NBN, 1, &skeleton)
        .await
        .unwrap();
    assert!(first.export.skeleton_record);
    assert!(first.file_metas.is_empty());

    let full = common::export_record(BAG_1);
    let amended = catalog
        .append_or_amend_version_export(NBN, 1, &full)
        .await
        .unwrap();

    // Same row, filled in.
    assert_eq!(amended.export.id, first.export.id);
    assert!(!amended.export.skeleton_record);
    assert_eq!(amended.file_metas.len(), 1);

    // Still exactly one export stored.
    let detail = catalog.find_dataset(NBN).await.unwrap();
    assert_eq!(detail.exports.len(), 1);
}

#[tokio::test]
async fn archived_timestamp_is_set_once() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();
    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();

    let first = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    catalog.set_archived_timestamp(NBN, 1, first).await.unwrap();

    let second = OffsetDateTime::from_unix_timestamp(1_800_000_000).unwrap();
    let err = catalog
        .set_archived_timestamp(NBN, 1, second)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    // The original timestamp stands.
    let export = catalog.find_version_export(NBN, 1).await.unwrap();
    assert_eq!(export.export.archived_timestamp, Some(first));
}

#[tokio::test]
async fn titles_are_bounded_at_three_hundred_chars() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    let mut record = common::export_record(BAG_1);
    record.title = Some("x".repeat(301));
    let stored = catalog
        .append_or_amend_version_export(NBN, 1, &record)
        .await
        .unwrap();

    let title = stored.export.title.unwrap();
    assert_eq!(title.chars().count(), 300);
    assert!(title.ends_with("..."));

    // Exactly 300 chars is left alone.
    let mut record = common::export_record(BAG_2);
    record.title = Some("y".repeat(300));
    let stored = catalog
        .append_or_amend_version_export(NBN, 2, &record)
        .await
        .unwrap();
    assert_eq!(stored.export.title.unwrap(), "y".repeat(300));
}

#[tokio::test]
async fn unconfirmed_lists_only_unarchived_exports() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();

    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();
    catalog
        .append_or_amend_version_export(NBN, 2, &common::export_record(BAG_2))
        .await
        .unwrap();

    let unconfirmed = catalog.list_unconfirmed(100, 0).await.unwrap();
    assert_eq!(unconfirmed.len(), 2);
    assert_eq!(unconfirmed[0].dataset_nbn, NBN);
    assert_eq!(unconfirmed[0].ocfl_object_version_number, 1);

    catalog
        .set_archived_timestamp(NBN, 1, OffsetDateTime::now_utc())
        .await
        .unwrap();

    let unconfirmed = catalog.list_unconfirmed(100, 0).await.unwrap();
    assert_eq!(unconfirmed.len(), 1);
    assert_eq!(unconfirmed[0].ocfl_object_version_number, 2);

    // Paging.
    let page = catalog.list_unconfirmed(1, 1).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn lookup_by_bag_id_returns_owning_dataset() {
    let catalog = common::setup_catalog().await;
    catalog
        .register_dataset(&common::new_dataset(NBN))
        .await
        .unwrap();
    catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap();

    let bag_id = BAG_1.parse().unwrap();
    let (dataset, detail) = catalog.find_version_export_by_bag_id(&bag_id).await.unwrap();
    assert_eq!(dataset.nbn, NBN);
    assert_eq!(detail.export.ocfl_object_version_number, 1);
    assert_eq!(detail.file_metas.len(), 1);
}

#[tokio::test]
async fn appending_to_a_missing_dataset_is_not_found() {
    let catalog = common::setup_catalog().await;
    let err = catalog
        .append_or_amend_version_export(NBN, 1, &common::export_record(BAG_1))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
