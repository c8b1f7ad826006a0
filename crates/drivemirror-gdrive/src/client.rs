//! Google Drive v3 API HTTP client
//!
//! Low-level client for the handful of Drive endpoints DriveMirror uses:
//! multipart create/update, media download, deletion and metadata lookup.
//!
//! ## Design Notes
//!
//! - Uploads always go through `uploadType=multipart`: one request carries
//!   the file metadata as a JSON part and the content as a base64 part.
//!   Drive's resumable sessions only pay off for multi-gigabyte payloads,
//!   which mirrored content never reaches.
//! - The API and upload hosts differ (`www.googleapis.com/drive/v3` vs
//!   `www.googleapis.com/upload/drive/v3`), so the client keeps two base
//!   URLs. Both are overridable for tests.

use anyhow::{Context, Result};
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use drivemirror_core::domain::newtypes::RemoteFileId;
use drivemirror_core::ports::RemoteFileMeta;

/// Production base URL for Drive v3 metadata and media endpoints
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Production base URL for Drive v3 upload endpoints
const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Metadata fields requested on lookups
const METADATA_FIELDS: &str = "id,name,mimeType,size,modifiedTime";

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for the Google Drive v3 API
///
/// Holds the OAuth2 access token and attaches it as a Bearer header on every
/// request. Token acquisition and refresh happen outside this crate; the
/// client only consumes a ready token.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: Client,
    api_base_url: String,
    upload_base_url: String,
    access_token: String,
    parent_folder: Option<String>,
}

impl DriveClient {
    /// Creates a client pointing at the production Drive endpoints
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, DRIVE_BASE_URL, DRIVE_UPLOAD_BASE_URL)
    }

    /// Creates a client with custom base URLs
    ///
    /// Used by tests to point the client at a local mock server.
    pub fn with_base_urls(
        access_token: impl Into<String>,
        api_base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base_url: api_base_url.into(),
            upload_base_url: upload_base_url.into(),
            access_token: access_token.into(),
            parent_folder: None,
        }
    }

    /// Sets the Drive folder that newly created files are placed in
    ///
    /// Without a parent folder, files land in the Drive root.
    #[must_use]
    pub fn with_parent_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.parent_folder = Some(folder_id.into());
        self
    }

    /// Builds a request against the metadata/media host with auth attached
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_base_url, path);
        self.client.request(method, &url).bearer_auth(&self.access_token)
    }

    /// Builds a request against the upload host with auth attached
    fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client.request(method, &url).bearer_auth(&self.access_token)
    }

    /// Creates a new Drive file from in-memory content
    ///
    /// # Arguments
    /// * `name` - Display name for the new file
    /// * `mime_type` - Media type recorded on the file
    /// * `data` - Full file content
    ///
    /// # Returns
    /// The ID Drive assigned to the new file.
    pub async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<RemoteFileId> {
        let mut metadata = serde_json::json!({
            "name": name,
            "mimeType": mime_type,
        });
        if let Some(folder) = &self.parent_folder {
            metadata["parents"] = serde_json::json!([folder]);
        }

        let boundary = multipart_boundary();
        let body = build_multipart_body(&metadata, mime_type, data, &boundary);

        let response: FileIdResponse = self
            .upload_request(Method::POST, "/files?uploadType=multipart&fields=id")
            .header(
                "Content-Type",
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .context("Failed to create Drive file")?
            .error_for_status()
            .context("Drive file creation returned error status")?
            .json()
            .await
            .context("Failed to parse Drive file creation response")?;

        debug!(
            "Created Drive file: id={}, name={}, {} bytes",
            response.id,
            name,
            data.len()
        );

        RemoteFileId::new(response.id).context("Drive returned an invalid file id")
    }

    /// Replaces the content and metadata of an existing Drive file
    ///
    /// The file keeps its ID; Drive versions the content internally.
    ///
    /// # Returns
    /// The file ID as confirmed by Drive.
    pub async fn update_file(
        &self,
        file_id: &RemoteFileId,
        name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<RemoteFileId> {
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": mime_type,
        });

        let boundary = multipart_boundary();
        let body = build_multipart_body(&metadata, mime_type, data, &boundary);
        let path = format!(
            "/files/{}?uploadType=multipart&fields=id",
            file_id.as_str()
        );

        let response: FileIdResponse = self
            .upload_request(Method::PATCH, &path)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to update Drive file {file_id}"))?
            .error_for_status()
            .with_context(|| format!("Drive update of file {file_id} returned error status"))?
            .json()
            .await
            .context("Failed to parse Drive file update response")?;

        debug!(
            "Updated Drive file: id={}, name={}, {} bytes",
            response.id,
            name,
            data.len()
        );

        RemoteFileId::new(response.id).context("Drive returned an invalid file id")
    }

    /// Permanently deletes a Drive file
    ///
    /// Drive responds 204 with an empty body on success.
    pub async fn delete_file(&self, file_id: &RemoteFileId) -> Result<()> {
        let path = format!("/files/{}", file_id.as_str());

        self.request(Method::DELETE, &path)
            .send()
            .await
            .with_context(|| format!("Failed to delete Drive file {file_id}"))?
            .error_for_status()
            .with_context(|| format!("Drive deletion of file {file_id} returned error status"))?;

        debug!("Deleted Drive file: id={}", file_id);
        Ok(())
    }

    /// Downloads the full content of a Drive file
    pub async fn download_file(&self, file_id: &RemoteFileId) -> Result<Vec<u8>> {
        let path = format!("/files/{}?alt=media", file_id.as_str());

        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("Failed to download Drive file {file_id}"))?
            .error_for_status()
            .with_context(|| format!("Drive download of file {file_id} returned error status"))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read content of Drive file {file_id}"))?;

        debug!("Downloaded {} bytes from Drive file {}", bytes.len(), file_id);
        Ok(bytes.to_vec())
    }

    /// Retrieves metadata for a Drive file
    pub async fn get_file_metadata(&self, file_id: &RemoteFileId) -> Result<RemoteFileMeta> {
        let path = format!("/files/{}?fields={}", file_id.as_str(), METADATA_FIELDS);

        let response: FileMetadataResponse = self
            .request(Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("Failed to fetch metadata of Drive file {file_id}"))?
            .error_for_status()
            .with_context(|| format!("Drive metadata of file {file_id} returned error status"))?
            .json()
            .await
            .context("Failed to parse Drive metadata response")?;

        debug!("Fetched metadata for Drive file {}", response.id);
        Ok(to_remote_meta(response))
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Minimal response for create/update calls issued with `fields=id`
#[derive(Debug, Deserialize)]
struct FileIdResponse {
    id: String,
}

/// Drive file resource as returned by metadata lookups
///
/// Drive serializes int64 fields as JSON strings, so `size` arrives as a
/// string and is parsed on conversion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadataResponse {
    id: String,
    name: Option<String>,
    mime_type: Option<String>,
    size: Option<String>,
    modified_time: Option<DateTime<Utc>>,
}

/// Converts a Drive file resource into the port-level metadata DTO
fn to_remote_meta(item: FileMetadataResponse) -> RemoteFileMeta {
    RemoteFileMeta {
        id: item.id,
        name: item.name.unwrap_or_default(),
        mime_type: item.mime_type,
        size: item.size.and_then(|s| s.parse().ok()),
        modified: item.modified_time,
    }
}

// ============================================================================
// Multipart helpers
// ============================================================================

/// Generates a boundary that cannot collide with part content
fn multipart_boundary() -> String {
    format!("drivemirror_{}", Uuid::new_v4().simple())
}

/// Assembles a `multipart/related` body for `uploadType=multipart`
///
/// The body carries exactly two parts: the file metadata as JSON and the
/// content base64-encoded, with a matching `Content-Transfer-Encoding`
/// header on the media part.
fn build_multipart_body(
    metadata: &serde_json::Value,
    mime_type: &str,
    data: &[u8],
    boundary: &str,
) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!(
        "--{boundary}\r\n\
         Content-Type: application/json; charset=UTF-8\r\n\
         \r\n\
         {metadata}\r\n\
         --{boundary}\r\n\
         Content-Type: {mime_type}\r\n\
         Content-Transfer-Encoding: base64\r\n\
         \r\n\
         {encoded}\r\n\
         --{boundary}--"
    )
}
