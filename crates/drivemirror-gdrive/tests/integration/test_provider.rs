//! Integration tests for the Drive-backed remote store
//!
//! Exercises the `IRemoteStore` implementation end to end: local files in a
//! temp directory on one side, a wiremock Drive API on the other.

use drivemirror_core::domain::newtypes::{MimeType, RemoteFileId};
use drivemirror_core::ports::IRemoteStore;
use drivemirror_gdrive::client::DriveClient;
use drivemirror_gdrive::provider::DriveRemoteStore;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

fn provider_for(server: &MockServer) -> DriveRemoteStore {
    let client = DriveClient::with_base_urls("test-access-token", server.uri(), server.uri());
    DriveRemoteStore::new(client)
}

fn text_mime() -> MimeType {
    MimeType::new("text/plain".to_string()).unwrap()
}

// ============================================================================
// Upload tests
// ============================================================================

#[tokio::test]
async fn test_upload_new_sends_local_content() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_string_contains("aGVsbG8gZHJpdmU="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "up-001"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let local = dir.path().join("notes.txt");
    std::fs::write(&local, b"hello drive").unwrap();

    let id = provider
        .upload_new(&local, &text_mime(), "notes.txt")
        .await
        .expect("Upload failed");

    assert_eq!(id.as_str(), "up-001");
}

#[tokio::test]
async fn test_upload_new_missing_local_file_fails() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);

    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent.txt");

    let result = provider.upload_new(&absent, &text_mime(), "absent.txt").await;

    assert!(result.is_err());
    // Nothing reached the backend.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_update_existing_returns_same_id() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);
    common::mount_update(&server, "existing-5").await;

    let dir = TempDir::new().unwrap();
    let local = dir.path().join("doc.txt");
    std::fs::write(&local, b"fresh content").unwrap();

    let remote_id = RemoteFileId::new("existing-5".to_string()).unwrap();
    let id = provider
        .update_existing(&remote_id, &local, &text_mime(), "doc.txt")
        .await
        .expect("Update failed");

    assert_eq!(id.as_str(), "existing-5");
}

// ============================================================================
// Download tests
// ============================================================================

#[tokio::test]
async fn test_download_to_local_writes_destination() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);
    common::mount_download(&server, "dl-1", b"restored bytes").await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("blobs/ab/restored.bin");

    let remote_id = RemoteFileId::new("dl-1".to_string()).unwrap();
    provider
        .download_to_local(&remote_id, &destination)
        .await
        .expect("Download failed");

    assert_eq!(std::fs::read(&destination).unwrap(), b"restored bytes");

    // The staging file is gone after the rename.
    let siblings: Vec<_> = std::fs::read_dir(destination.parent().unwrap())
        .unwrap()
        .collect();
    assert_eq!(siblings.len(), 1);
}

#[tokio::test]
async fn test_download_to_local_failure_leaves_no_file() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);

    Mock::given(method("GET"))
        .and(path("/files/broken-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {
                "code": 500,
                "message": "Internal Error",
                "errors": [{"reason": "internalError", "domain": "global"}]
            }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("restored.bin");

    let remote_id = RemoteFileId::new("broken-1".to_string()).unwrap();
    let result = provider.download_to_local(&remote_id, &destination).await;

    assert!(result.is_err());
    assert!(!destination.exists());
}

// ============================================================================
// Delete and metadata tests
// ============================================================================

#[tokio::test]
async fn test_delete_delegates_to_backend() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);
    common::mount_delete(&server, "del-7").await;

    let remote_id = RemoteFileId::new("del-7".to_string()).unwrap();
    let result = provider.delete(&remote_id).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_get_metadata_maps_backend_fields() {
    let (server, _) = common::setup_drive_mock().await;
    let provider = provider_for(&server);

    common::mount_metadata(
        &server,
        "meta-9",
        serde_json::json!({
            "id": "meta-9",
            "name": "mirrored.bin",
            "mimeType": "application/octet-stream",
            "size": "14",
            "modifiedTime": "2026-02-01T08:00:00.000Z"
        }),
    )
    .await;

    let remote_id = RemoteFileId::new("meta-9".to_string()).unwrap();
    let meta = provider
        .get_metadata(&remote_id)
        .await
        .expect("Metadata lookup failed");

    assert_eq!(meta.id, "meta-9");
    assert_eq!(meta.name, "mirrored.bin");
    assert_eq!(meta.size, Some(14));
}
