//! Remote store port (driven/secondary port)
//!
//! This module defines the interface for the remote storage backend that
//! mirrored content is pushed to. The primary implementation targets Google
//! Drive via its v3 REST API, but the trait is backend-agnostic.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification; the engine
//!   treats any failure from these methods as a per-record remote failure.
//! - Content moves by filesystem path, not by in-memory buffer: the engine
//!   resolves a blob path via the blob-store port and hands it over, so
//!   adapters can stream large files without the core holding the bytes.
//! - `RemoteFileMeta` is a port-level DTO, not a domain entity.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::newtypes::{MimeType, RemoteFileId};

// ============================================================================
// RemoteFileMeta DTO
// ============================================================================

/// Metadata of an object held by the remote backend
///
/// Retrieved on demand for inspection; the reconciliation flow itself never
/// depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFileMeta {
    /// Backend identifier of the object
    pub id: String,
    /// Object name as known to the backend
    pub name: String,
    /// Media type the backend reports
    pub mime_type: Option<String>,
    /// Object size in bytes, when the backend reports one
    pub size: Option<u64>,
    /// Last modification timestamp at the backend
    pub modified: Option<DateTime<Utc>>,
}

// ============================================================================
// IRemoteStore trait
// ============================================================================

/// Port trait for the remote storage backend
///
/// The four content operations mirror the reconciliation engine's needs:
/// create, update in place, remove, and fetch back to a local path. Every
/// push re-uploads the full content; there is no delta transfer.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Uploads content that has no remote counterpart yet
    ///
    /// # Arguments
    /// * `local_path` - Filesystem path of the content to upload
    /// * `mime_type` - Media type to record at the backend
    /// * `name` - Display name for the remote object
    ///
    /// # Returns
    /// The backend handle of the newly created object.
    async fn upload_new(
        &self,
        local_path: &Path,
        mime_type: &MimeType,
        name: &str,
    ) -> anyhow::Result<RemoteFileId>;

    /// Replaces the content of an existing remote object
    ///
    /// # Returns
    /// The backend handle of the object, normally unchanged from `remote_id`.
    async fn update_existing(
        &self,
        remote_id: &RemoteFileId,
        local_path: &Path,
        mime_type: &MimeType,
        name: &str,
    ) -> anyhow::Result<RemoteFileId>;

    /// Removes a remote object
    async fn delete(&self, remote_id: &RemoteFileId) -> anyhow::Result<()>;

    /// Downloads a remote object's content to a local path
    ///
    /// The destination is written atomically; a failed download never leaves
    /// a partial file at `destination`.
    async fn download_to_local(
        &self,
        remote_id: &RemoteFileId,
        destination: &Path,
    ) -> anyhow::Result<()>;

    /// Retrieves metadata for a remote object
    async fn get_metadata(&self, remote_id: &RemoteFileId) -> anyhow::Result<RemoteFileMeta>;
}
