//! HTTP smoke tests: drive the full router with in-process requests.

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use vault_catalog::config::Config;
use vault_catalog::http_server;
use vault_catalog::state::State;

const NBN: &str = "urn:nbn:nl:ui:13-00000000-0000-0000-0000-000000000000";
const BAG_1: &str = "urn:uuid:00000000-0000-0000-0000-000000000001";

async fn setup_router() -> axum::Router {
    let state = State::from_config(&Config::default()).await.unwrap();
    http_server::router(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let router = setup_router().await;
    let response = router
        .oneshot(get_request("/_status/healthz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_and_fetch_dataset_over_http() {
    let router = setup_router().await;

    let body = serde_json::json!({
        "nbn": NBN,
        "ocfl_storage_root": "srd/storage01",
        "data_supplier": "utrecht-university",
    });
    let response = router
        .clone()
        .oneshot(json_request("PUT", &format!("/api/v0/dataset/{NBN}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/v0/dataset/{NBN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["nbn"], NBN);
    assert_eq!(json["ocfl_storage_root"], "srd/storage01");
    assert!(json["version_exports"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn nbn_mismatch_is_a_bad_request() {
    let router = setup_router().await;

    let body = serde_json::json!({
        "nbn": "urn:nbn:nl:ui:13-something-else",
        "ocfl_storage_root": "srd/storage01",
    });
    let response = router
        .oneshot(json_request("PUT", &format!("/api/v0/dataset/{NBN}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let router = setup_router().await;

    let body = serde_json::json!({
        "nbn": NBN,
        "ocfl_storage_root": "srd/storage01",
    });
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v0/dataset/{NBN}"),
            body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(json_request("PUT", &format!("/api/v0/dataset/{NBN}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_dataset_is_not_found() {
    let router = setup_router().await;
    let response = router
        .oneshot(get_request(&format!("/api/v0/dataset/{NBN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn version_export_lifecycle_over_http() {
    let router = setup_router().await;

    let dataset = serde_json::json!({
        "nbn": NBN,
        "ocfl_storage_root": "srd/storage01",
    });
    let response = router
        .clone()
        .oneshot(json_request("PUT", &format!("/api/v0/dataset/{NBN}"), dataset))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let export = serde_json::json!({
        "bag_id": BAG_1,
        "ocfl_object_version_number": 1,
        "title": "A deposit",
        "file_metas": [{
            "filepath": "data/document.pdf",
            "file_uri": format!("{BAG_1}/data/document.pdf"),
            "byte_size": 1024,
            "sha1sum": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        }],
    });
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v0/dataset/{NBN}/version-export"),
            export.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["bag_id"], BAG_1);
    assert_eq!(json["ocfl_object_version_number"], 1);

    // A gap is a conflict at the API boundary.
    let gapped = serde_json::json!({
        "bag_id": "urn:uuid:00000000-0000-0000-0000-000000000009",
        "ocfl_object_version_number": 3,
    });
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v0/dataset/{NBN}/version-export"),
            gapped,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Confirm archival, then the export leaves the unconfirmed page.
    let response = router
        .clone()
        .oneshot(get_request("/api/v0/version-export/unconfirmed"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let confirm = serde_json::json!({"archived_timestamp": "2023-11-14T22:13:20Z"});
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v0/dataset/{NBN}/version-export/1/archived-timestamp"),
            confirm.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v0/dataset/{NBN}/version-export/1/archived-timestamp"),
            confirm,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(get_request("/api/v0/version-export/unconfirmed"))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    // Lookup by bag id resolves the owning dataset.
    let response = router
        .oneshot(get_request(&format!("/api/v0/version-export/{BAG_1}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["dataset_nbn"], NBN);
}

#[tokio::test]
async fn malformed_bag_id_is_a_bad_request() {
    let router = setup_router().await;
    let response = router
        .oneshot(get_request("/api/v0/version-export/not-a-bag-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ocfl_object_and_tar_over_http() {
    let router = setup_router().await;

    let object = serde_json::json!({
        "nbn": NBN,
        "ocfl_object_path": "aa/bb/cc/dd",
    });
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v0/ocfl-object/{BAG_1}/1"),
            object,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let tar_id = uuid::Uuid::new_v4();
    let tar = serde_json::json!({
        "tar_uuid": tar_id,
        "vault_path": "vault/tar-0001",
        "tar_parts": [{"part_name": "0000", "checksum_algorithm": "md5",
                       "checksum_value": "d41d8cd98f00b204e9800998ecf8427e", "part_size": 4096}],
        "ocfl_object_versions": [{"bag_id": BAG_1, "object_version": 1}],
    });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v0/tar", tar.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/v0/tar/{tar_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["vault_path"], "vault/tar-0001");
    assert_eq!(json["ocfl_object_versions"].as_array().unwrap().len(), 1);

    // Sealing the same version into another tar is a conflict.
    let other = serde_json::json!({
        "tar_uuid": uuid::Uuid::new_v4(),
        "vault_path": "vault/tar-0002",
        "ocfl_object_versions": [{"bag_id": BAG_1, "object_version": 1}],
    });
    let response = router
        .oneshot(json_request("POST", "/api/v0/tar", other))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_route_falls_back_to_not_found() {
    let router = setup_router().await;
    let response = router
        .oneshot(get_request("/api/v0/no-such-thing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("catalog"));
}

#[tokio::test]
async fn unknown_route_renders_html_for_browsers() {
    let router = setup_router().await;
    let request = Request::builder()
        .method("GET")
        .uri("/no-such-page")
        .header(http::header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("vault catalog"));
}
