//! Shared test helpers for Drive API integration tests
//!
//! Provides wiremock-based mock server setup for the Drive v3 endpoints.
//! Each helper mounts one mock endpoint; `setup_drive_mock` returns a
//! client with both base URLs pointing at the mock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivemirror_gdrive::client::DriveClient;

/// Starts a mock server and returns it with a client pointing at it.
///
/// The API and upload hosts both resolve to the same mock server, matching
/// how the endpoints are told apart in production: by path and query.
pub async fn setup_drive_mock() -> (MockServer, DriveClient) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_urls("test-access-token", server.uri(), server.uri());
    (server, client)
}

/// Mounts the multipart create endpoint, responding with the given file id.
pub async fn mount_create(server: &MockServer, response_id: &str) {
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": response_id
        })))
        .mount(server)
        .await;
}

/// Mounts the multipart update endpoint for a specific file id.
pub async fn mount_update(server: &MockServer, file_id: &str) {
    let path_str = format!("/files/{}", file_id);
    Mock::given(method("PATCH"))
        .and(path(&path_str))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": file_id
        })))
        .mount(server)
        .await;
}

/// Mounts a media download endpoint for a specific file id.
pub async fn mount_download(server: &MockServer, file_id: &str, content: &[u8]) {
    let path_str = format!("/files/{}", file_id);
    Mock::given(method("GET"))
        .and(path(&path_str))
        .and(query_param("alt", "media"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

/// Mounts a deletion endpoint for a specific file id.
pub async fn mount_delete(server: &MockServer, file_id: &str) {
    let path_str = format!("/files/{}", file_id);
    Mock::given(method("DELETE"))
        .and(path(&path_str))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// Mounts a metadata endpoint for a specific file id.
pub async fn mount_metadata(server: &MockServer, file_id: &str, body: serde_json::Value) {
    let path_str = format!("/files/{}", file_id);
    Mock::given(method("GET"))
        .and(path(&path_str))
        .and(query_param("fields", "id,name,mimeType,size,modifiedTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
