//! Integration tests for the OCFL object version registry and tar
//! membership: idempotent saves, exclusive membership, and rejection
//! atomicity.

mod common;

use time::OffsetDateTime;
use uuid::Uuid;

use vault_catalog::catalog::{Catalog, CatalogError};
use vault_catalog::database::models::OcflObjectVersionRef;
use vault_catalog::database::object_queries::ObjectVersionRecord;
use vault_catalog::database::tar_queries::{TarPartRecord, TarRecord};

const BAG_A: &str = "urn:uuid:aaaaaaaa-0000-0000-0000-000000000001";
const BAG_B: &str = "urn:uuid:bbbbbbbb-0000-0000-0000-000000000002";

fn object_ref(bag_id: &str, object_version: i64) -> OcflObjectVersionRef {
    OcflObjectVersionRef {
        bag_id: bag_id.to_string(),
        object_version,
    }
}

fn object_record(nbn: &str) -> ObjectVersionRecord {
    ObjectVersionRecord {
        nbn: Some(nbn.to_string()),
        ocfl_object_path: Some("aa/bb/cc/dd".to_string()),
        ..Default::default()
    }
}

fn tar_record(vault_path: &str) -> TarRecord {
    TarRecord {
        vault_path: vault_path.to_string(),
        archival_timestamp: Some(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()),
        parts: vec![TarPartRecord {
            part_name: "0000".to_string(),
            checksum_algorithm: Some("md5".to_string()),
            checksum_value: Some("d41d8cd98f00b204e9800998ecf8427e".to_string()),
            part_size: Some(4096),
        }],
    }
}

async fn seed_versions(catalog: &Catalog) {
    catalog
        .save_object_version(&object_ref(BAG_A, 1), &object_record("urn:nbn:nl:ui:13-aa"))
        .await
        .unwrap();
    catalog
        .save_object_version(&object_ref(BAG_B, 1), &object_record("urn:nbn:nl:ui:13-bb"))
        .await
        .unwrap();
}

#[tokio::test]
async fn save_is_an_upsert() {
    let catalog = common::setup_catalog().await;

    let first = catalog
        .save_object_version(&object_ref(BAG_A, 1), &object_record("urn:nbn:nl:ui:13-aa"))
        .await
        .unwrap();
    assert!(first.updated.is_none());

    let mut record = object_record("urn:nbn:nl:ui:13-aa");
    record.data_supplier = Some("leiden-university".to_string());
    let second = catalog
        .save_object_version(&object_ref(BAG_A, 1), &record)
        .await
        .unwrap();

    // Same row, replaced fields, creation timestamp intact.
    assert_eq!(second.id, first.id);
    assert_eq!(second.created, first.created);
    assert_eq!(second.data_supplier.as_deref(), Some("leiden-university"));
    assert!(second.updated.is_some());
}

#[tokio::test]
async fn save_rejects_a_malformed_bag_id() {
    let catalog = common::setup_catalog().await;
    let err = catalog
        .save_object_version(
            &object_ref("not-a-bag-id", 1),
            &ObjectVersionRecord::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MalformedBagId(_)));
}

#[tokio::test]
async fn a_version_belongs_to_at_most_one_tar() {
    let catalog = common::setup_catalog().await;
    seed_versions(&catalog).await;

    let tar_a = Uuid::new_v4();
    catalog
        .create_tar(tar_a, &tar_record("vault/tar-a"), &[object_ref(BAG_A, 1)])
        .await
        .unwrap();

    // A second tar referencing the same version is rejected, naming the
    // holder.
    let tar_b = Uuid::new_v4();
    let err = catalog
        .create_tar(
            tar_b,
            &tar_record("vault/tar-b"),
            &[object_ref(BAG_A, 1), object_ref(BAG_B, 1)],
        )
        .await
        .unwrap_err();
    match err {
        CatalogError::AlreadyInContainer { tar_id, .. } => {
            assert_eq!(tar_id, tar_a.to_string());
        }
        other => panic!("expected AlreadyInContainer, got {other:?}"),
    }

    // Nothing of the rejected tar persisted.
    let err = catalog.find_tar(tar_b).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    // The untainted version stayed unclaimed.
    let version_b = catalog.find_object_version(BAG_B, 1).await.unwrap();
    assert!(version_b.tar_id.is_none());

    // And the original membership is intact.
    let detail = catalog.find_tar(tar_a).await.unwrap();
    assert_eq!(detail.members.len(), 1);
    assert_eq!(detail.members[0].bag_id, BAG_A);
}

#[tokio::test]
async fn updating_a_tar_with_its_own_member_is_a_noop() {
    let catalog = common::setup_catalog().await;
    seed_versions(&catalog).await;

    let tar_a = Uuid::new_v4();
    catalog
        .create_tar(tar_a, &tar_record("vault/tar-a"), &[object_ref(BAG_A, 1)])
        .await
        .unwrap();

    let detail = catalog
        .update_tar(tar_a, &tar_record("vault/tar-a2"), &[object_ref(BAG_A, 1)])
        .await
        .unwrap();

    assert_eq!(detail.tar.vault_path, "vault/tar-a2");
    assert_eq!(detail.members.len(), 1);
}

#[tokio::test]
async fn updating_membership_releases_dropped_versions() {
    let catalog = common::setup_catalog().await;
    seed_versions(&catalog).await;

    let tar_a = Uuid::new_v4();
    catalog
        .create_tar(
            tar_a,
            &tar_record("vault/tar-a"),
            &[object_ref(BAG_A, 1), object_ref(BAG_B, 1)],
        )
        .await
        .unwrap();

    let detail = catalog
        .update_tar(tar_a, &tar_record("vault/tar-a"), &[object_ref(BAG_A, 1)])
        .await
        .unwrap();
    assert_eq!(detail.members.len(), 1);

    // The dropped version is claimable again.
    let version_b = catalog.find_object_version(BAG_B, 1).await.unwrap();
    assert!(version_b.tar_id.is_none());

    let tar_b = Uuid::new_v4();
    catalog
        .create_tar(tar_b, &tar_record("vault/tar-b"), &[object_ref(BAG_B, 1)])
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_tar_id_leaves_the_stored_tar_untouched() {
    let catalog = common::setup_catalog().await;
    seed_versions(&catalog).await;

    let tar_a = Uuid::new_v4();
    catalog
        .create_tar(tar_a, &tar_record("vault/tar-a"), &[object_ref(BAG_A, 1)])
        .await
        .unwrap();

    let err = catalog
        .create_tar(tar_a, &tar_record("vault/other"), &[object_ref(BAG_B, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyExists(_)));

    let detail = catalog.find_tar(tar_a).await.unwrap();
    assert_eq!(detail.tar.vault_path, "vault/tar-a");
    assert_eq!(detail.parts.len(), 1);
    assert_eq!(detail.members.len(), 1);
}

#[tokio::test]
async fn tar_with_a_missing_member_is_rejected() {
    let catalog = common::setup_catalog().await;

    let err = catalog
        .create_tar(
            Uuid::new_v4(),
            &tar_record("vault/tar-a"),
            &[object_ref(BAG_A, 7)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn updating_a_missing_tar_is_not_found() {
    let catalog = common::setup_catalog().await;
    let err = catalog
        .update_tar(Uuid::new_v4(), &tar_record("vault/tar-a"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn versions_are_listed_by_nbn() {
    let catalog = common::setup_catalog().await;
    seed_versions(&catalog).await;
    catalog
        .save_object_version(&object_ref(BAG_A, 2), &object_record("urn:nbn:nl:ui:13-aa"))
        .await
        .unwrap();

    let versions = catalog
        .find_object_versions_by_nbn("urn:nbn:nl:ui:13-aa")
        .await
        .unwrap();
    assert_eq!(versions.len(), 2);

    let err = catalog
        .find_object_versions_by_nbn("urn:nbn:nl:ui:13-zz")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
