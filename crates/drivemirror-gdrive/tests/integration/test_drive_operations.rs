//! Integration tests for the Drive v3 client
//!
//! Verifies multipart create/update, media download, deletion and metadata
//! lookup against a wiremock-based Drive API mock server.

use drivemirror_core::domain::newtypes::RemoteFileId;
use drivemirror_gdrive::client::DriveClient;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

// ============================================================================
// Create tests
// ============================================================================

#[tokio::test]
async fn test_create_file_returns_assigned_id() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_create(&server, "created-001").await;

    let id = client
        .create_file("report.pdf", "application/pdf", b"hello")
        .await
        .expect("Create failed");

    assert_eq!(id.as_str(), "created-001");
}

#[tokio::test]
async fn test_create_file_sends_multipart_body() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(query_param("uploadType", "multipart"))
        .and(body_string_contains(r#""name":"report.pdf""#))
        .and(body_string_contains("Content-Transfer-Encoding: base64"))
        .and(body_string_contains("aGVsbG8="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "mp-001"
        })))
        .mount(&server)
        .await;

    let id = client
        .create_file("report.pdf", "application/pdf", b"hello")
        .await
        .expect("Create failed");

    assert_eq!(id.as_str(), "mp-001");
}

#[tokio::test]
async fn test_create_file_includes_parent_folder() {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_urls("test-token", server.uri(), server.uri())
        .with_parent_folder("folder-1");

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_string_contains(r#""parents":["folder-1"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "in-folder-001"
        })))
        .mount(&server)
        .await;

    let id = client
        .create_file("report.pdf", "application/pdf", b"hello")
        .await
        .expect("Create failed");

    assert_eq!(id.as_str(), "in-folder-001");
}

#[tokio::test]
async fn test_create_file_without_folder_omits_parents() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_create(&server, "rootward-001").await;

    client
        .create_file("plain.txt", "text/plain", b"hello")
        .await
        .expect("Create failed");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(!body.contains("parents"));
}

#[tokio::test]
async fn test_create_file_errors_on_401() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {
                "code": 401,
                "message": "Invalid Credentials",
                "errors": [{"reason": "authError", "domain": "global"}]
            }
        })))
        .mount(&server)
        .await;

    let client = DriveClient::with_base_urls("expired-token", server.uri(), server.uri());
    let result = client.create_file("a.txt", "text/plain", b"x").await;

    assert!(result.is_err());
}

// ============================================================================
// Update tests
// ============================================================================

#[tokio::test]
async fn test_update_file_keeps_id() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_update(&server, "existing-9").await;

    let remote_id = RemoteFileId::new("existing-9".to_string()).unwrap();
    let id = client
        .update_file(&remote_id, "new.pdf", "application/pdf", b"fresh content")
        .await
        .expect("Update failed");

    assert_eq!(id.as_str(), "existing-9");
}

#[tokio::test]
async fn test_update_file_sends_patched_content() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/files/existing-9"))
        .and(query_param("uploadType", "multipart"))
        .and(body_string_contains("ZnJlc2ggY29udGVudA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "existing-9"
        })))
        .mount(&server)
        .await;

    let remote_id = RemoteFileId::new("existing-9".to_string()).unwrap();
    let result = client
        .update_file(&remote_id, "new.pdf", "application/pdf", b"fresh content")
        .await;

    assert!(result.is_ok());
}

// ============================================================================
// Delete tests
// ============================================================================

#[tokio::test]
async fn test_delete_file_succeeds_on_204() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_delete(&server, "del-1").await;

    let remote_id = RemoteFileId::new("del-1".to_string()).unwrap();
    let result = client.delete_file(&remote_id).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_file_errors_on_404() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/files/gone-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": 404,
                "message": "File not found: gone-1",
                "errors": [{"reason": "notFound", "domain": "global"}]
            }
        })))
        .mount(&server)
        .await;

    let remote_id = RemoteFileId::new("gone-1".to_string()).unwrap();
    let result = client.delete_file(&remote_id).await;

    assert!(result.is_err());
}

// ============================================================================
// Download tests
// ============================================================================

#[tokio::test]
async fn test_download_file_returns_content() {
    let (server, client) = common::setup_drive_mock().await;

    let file_content = b"Hello, Drive! This is mirrored content.";
    common::mount_download(&server, "download-001", file_content).await;

    let remote_id = RemoteFileId::new("download-001".to_string()).unwrap();
    let data = client
        .download_file(&remote_id)
        .await
        .expect("Download failed");

    assert_eq!(data, file_content);
}

#[tokio::test]
async fn test_download_large_file() {
    let (server, client) = common::setup_drive_mock().await;

    // 1 MiB of repeating bytes.
    let file_content: Vec<u8> = (0..1_048_576).map(|i| (i % 256) as u8).collect();
    common::mount_download(&server, "large-001", &file_content).await;

    let remote_id = RemoteFileId::new("large-001".to_string()).unwrap();
    let data = client
        .download_file(&remote_id)
        .await
        .expect("Large download failed");

    assert_eq!(data.len(), 1_048_576);
    assert_eq!(data, file_content);
}

#[tokio::test]
async fn test_download_empty_file() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_download(&server, "empty-001", &[]).await;

    let remote_id = RemoteFileId::new("empty-001".to_string()).unwrap();
    let data = client
        .download_file(&remote_id)
        .await
        .expect("Empty download failed");

    assert!(data.is_empty());
}

#[tokio::test]
async fn test_download_returns_error_on_404() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": 404,
                "message": "File not found: nonexistent",
                "errors": [{"reason": "notFound", "domain": "global"}]
            }
        })))
        .mount(&server)
        .await;

    let remote_id = RemoteFileId::new("nonexistent".to_string()).unwrap();
    let result = client.download_file(&remote_id).await;

    assert!(result.is_err());
}

// ============================================================================
// Metadata tests
// ============================================================================

#[tokio::test]
async fn test_get_file_metadata_maps_fields() {
    let (server, client) = common::setup_drive_mock().await;

    common::mount_metadata(
        &server,
        "meta-1",
        serde_json::json!({
            "id": "meta-1",
            "name": "report.pdf",
            "mimeType": "application/pdf",
            "size": "2048",
            "modifiedTime": "2026-01-15T10:30:00.000Z"
        }),
    )
    .await;

    let remote_id = RemoteFileId::new("meta-1".to_string()).unwrap();
    let meta = client
        .get_file_metadata(&remote_id)
        .await
        .expect("Metadata lookup failed");

    assert_eq!(meta.id, "meta-1");
    assert_eq!(meta.name, "report.pdf");
    assert_eq!(meta.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(meta.size, Some(2048));
    assert!(meta.modified.is_some());
}

#[tokio::test]
async fn test_get_file_metadata_tolerates_minimal_response() {
    let (server, client) = common::setup_drive_mock().await;

    common::mount_metadata(&server, "meta-2", serde_json::json!({"id": "meta-2"})).await;

    let remote_id = RemoteFileId::new("meta-2".to_string()).unwrap();
    let meta = client
        .get_file_metadata(&remote_id)
        .await
        .expect("Metadata lookup failed");

    assert_eq!(meta.id, "meta-2");
    assert_eq!(meta.name, "");
    assert!(meta.size.is_none());
    assert!(meta.modified.is_none());
}
