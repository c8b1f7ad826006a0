//! `IRemoteStore` implementation backed by Google Drive
//!
//! Bridges the backend-agnostic remote store port to the Drive v3 client:
//! content arrives as filesystem paths, gets read into memory and handed to
//! the client, and downloads are written back atomically.
//!
//! ## Design Notes
//!
//! - `DriveClient` keeps no mutable state and all its methods take `&self`,
//!   so the provider holds it directly without interior locking.
//! - Downloads land in a `.part` sibling first and are renamed into place,
//!   per the port's atomicity contract. The suffix differs from the blob
//!   store's `.tmp` so the two writers never collide on a staging path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use drivemirror_core::domain::newtypes::{MimeType, RemoteFileId};
use drivemirror_core::ports::{IRemoteStore, RemoteFileMeta};

use crate::client::DriveClient;

/// Remote store adapter targeting Google Drive
pub struct DriveRemoteStore {
    client: DriveClient,
}

impl DriveRemoteStore {
    /// Wraps a configured Drive client
    #[must_use]
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DriveRemoteStore {
    async fn upload_new(
        &self,
        local_path: &Path,
        mime_type: &MimeType,
        name: &str,
    ) -> Result<RemoteFileId> {
        debug!(name, path = %local_path.display(), "DriveRemoteStore::upload_new");

        let data = read_content(local_path).await?;
        self.client
            .create_file(name, mime_type.as_str(), &data)
            .await
    }

    async fn update_existing(
        &self,
        remote_id: &RemoteFileId,
        local_path: &Path,
        mime_type: &MimeType,
        name: &str,
    ) -> Result<RemoteFileId> {
        debug!(id = %remote_id, name, "DriveRemoteStore::update_existing");

        let data = read_content(local_path).await?;
        self.client
            .update_file(remote_id, name, mime_type.as_str(), &data)
            .await
    }

    async fn delete(&self, remote_id: &RemoteFileId) -> Result<()> {
        debug!(id = %remote_id, "DriveRemoteStore::delete");

        self.client.delete_file(remote_id).await
    }

    async fn download_to_local(
        &self,
        remote_id: &RemoteFileId,
        destination: &Path,
    ) -> Result<()> {
        debug!(id = %remote_id, destination = %destination.display(), "DriveRemoteStore::download_to_local");

        let data = self.client.download_file(remote_id).await?;
        write_atomic(destination, &data).await
    }

    async fn get_metadata(&self, remote_id: &RemoteFileId) -> Result<RemoteFileMeta> {
        debug!(id = %remote_id, "DriveRemoteStore::get_metadata");

        self.client.get_file_metadata(remote_id).await
    }
}

/// Reads the full content of a local file slated for upload
async fn read_content(local_path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(local_path)
        .await
        .with_context(|| format!("Failed to read local content at {}", local_path.display()))
}

/// Writes `data` to `destination` via a staging file and rename
async fn write_atomic(destination: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut staging: OsString = destination.as_os_str().to_owned();
    staging.push(".part");
    let staging = PathBuf::from(staging);

    tokio::fs::write(&staging, data)
        .await
        .with_context(|| format!("Failed to write staging file {}", staging.display()))?;
    tokio::fs::rename(&staging, destination)
        .await
        .with_context(|| {
            format!(
                "Failed to move download into place at {}",
                destination.display()
            )
        })?;

    Ok(())
}
