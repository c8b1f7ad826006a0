//! File intake use case
//!
//! Orchestrates how content enters and leaves local management: storing new
//! content, replacing the content of a tracked record, flagging a record for
//! remote removal, and importing content from an external URL. Every
//! operation here only touches local state; the reconciliation engine
//! propagates the resulting statuses to the remote backend later.

use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::{
    domain::{FileRecord, MimeType, RecordId, StorageKey},
    ports::{IBlobStore, IContentFetcher, IRecordRepository},
};

// ============================================================================
// IntakeError
// ============================================================================

/// Errors the intake operations can fail with beyond infrastructure faults
///
/// Wrapped in `anyhow::Error` on return; callers that need to distinguish
/// these cases downcast.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// No record exists with the given id
    #[error("No record found with id {0}")]
    NotFound(RecordId),

    /// Content exceeds the configured maximum upload size
    #[error("Content size {size} bytes exceeds the configured limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

// ============================================================================
// FileIntakeUseCase
// ============================================================================

/// Use case for bringing content under local management
///
/// Coordinates the record repository, the blob store, and the content
/// fetcher. Enforces the configured upload size limit at the boundary so no
/// oversized blob ever lands on disk.
pub struct FileIntakeUseCase {
    records: Arc<dyn IRecordRepository + Send + Sync>,
    blobs: Arc<dyn IBlobStore + Send + Sync>,
    fetcher: Arc<dyn IContentFetcher + Send + Sync>,
    max_upload_bytes: u64,
}

impl FileIntakeUseCase {
    /// Creates a new FileIntakeUseCase with the required dependencies
    ///
    /// # Arguments
    ///
    /// * `records` - Persistent storage for file records
    /// * `blobs` - Local content storage
    /// * `fetcher` - Retrieval of content from external URLs
    /// * `max_upload_bytes` - Upper bound on accepted content size
    pub fn new(
        records: Arc<dyn IRecordRepository + Send + Sync>,
        blobs: Arc<dyn IBlobStore + Send + Sync>,
        fetcher: Arc<dyn IContentFetcher + Send + Sync>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            records,
            blobs,
            fetcher,
            max_upload_bytes,
        }
    }

    /// Stores new content and creates its tracking record
    ///
    /// This method:
    /// 1. Rejects content larger than the configured limit
    /// 2. Generates a fresh storage key and writes the blob
    /// 3. Creates and persists a record awaiting its first push
    ///
    /// # Arguments
    ///
    /// * `original_name` - Display name the content arrived under
    /// * `mime_type` - Media type of the content
    /// * `data` - The content itself
    ///
    /// # Returns
    ///
    /// The newly created record
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TooLarge`] for oversized content, or an error
    /// if the blob write or record persistence fails
    pub async fn store_new(
        &self,
        original_name: &str,
        mime_type: MimeType,
        data: &[u8],
    ) -> Result<FileRecord> {
        self.check_size(data)?;

        let storage_key = StorageKey::generate(original_name);
        self.blobs
            .write(&storage_key, data)
            .await
            .context("Failed to write content to the blob store")?;

        let record = FileRecord::new(
            original_name.to_string(),
            storage_key,
            mime_type,
            data.len() as u64,
        );
        self.records
            .save_record(&record)
            .await
            .context("Failed to persist new file record")?;

        Ok(record)
    }

    /// Replaces the content of an existing record
    ///
    /// This method:
    /// 1. Looks up the record, failing with `NotFound` for unknown ids
    /// 2. Rejects content larger than the configured limit
    /// 3. Writes the new content under a freshly generated storage key
    /// 4. Updates the record and persists it, then removes the old blob
    ///
    /// The record comes out flagged for re-upload while keeping its remote
    /// handle, so the next reconciliation pass updates the remote object in
    /// place instead of creating a duplicate.
    ///
    /// # Arguments
    ///
    /// * `id` - Id of the record to replace content for
    /// * `original_name` - Display name of the replacement content
    /// * `mime_type` - Media type of the replacement content
    /// * `data` - The replacement content
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::NotFound`] for unknown ids,
    /// [`IntakeError::TooLarge`] for oversized content, or an error if a
    /// blob or persistence operation fails
    pub async fn replace_content(
        &self,
        id: &RecordId,
        original_name: &str,
        mime_type: MimeType,
        data: &[u8],
    ) -> Result<FileRecord> {
        let mut record = self
            .records
            .find_by_id(id)
            .await
            .context("Failed to look up record for content replacement")?
            .ok_or(IntakeError::NotFound(*id))?;

        self.check_size(data)?;

        let old_key = record.storage_key().clone();
        let new_key = StorageKey::generate(original_name);
        self.blobs
            .write(&new_key, data)
            .await
            .context("Failed to write replacement content to the blob store")?;

        record.replace_content(
            new_key,
            mime_type,
            data.len() as u64,
            original_name.to_string(),
        );
        self.records
            .save_record(&record)
            .await
            .context("Failed to persist record after content replacement")?;

        // The old blob goes last so a failure earlier never strands the
        // record pointing at removed content.
        let old_exists = self
            .blobs
            .exists(&old_key)
            .await
            .context("Failed to check for the previous content blob")?;
        if old_exists {
            self.blobs
                .delete(&old_key)
                .await
                .context("Failed to remove the previous content blob")?;
        }

        Ok(record)
    }

    /// Flags a record for removal from the remote backend
    ///
    /// This method:
    /// 1. Looks up the record, failing with `NotFound` for unknown ids
    /// 2. Removes the local blob if it is still present
    /// 3. Forces the record into the removal queue and persists it
    ///
    /// The record survives as a tombstone; the reconciliation engine performs
    /// the actual remote deletion.
    ///
    /// # Arguments
    ///
    /// * `id` - Id of the record to flag
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::NotFound`] for unknown ids, or an error if a
    /// blob or persistence operation fails
    pub async fn request_deletion(&self, id: &RecordId) -> Result<FileRecord> {
        let mut record = self
            .records
            .find_by_id(id)
            .await
            .context("Failed to look up record for deletion request")?
            .ok_or(IntakeError::NotFound(*id))?;

        // The blob may already be gone if an earlier attempt was interrupted.
        let blob_exists = self
            .blobs
            .exists(record.storage_key())
            .await
            .context("Failed to check for the content blob")?;
        if blob_exists {
            self.blobs
                .delete(record.storage_key())
                .await
                .context("Failed to remove the content blob")?;
        }

        record.request_deletion();
        self.records
            .save_record(&record)
            .await
            .context("Failed to persist record after deletion request")?;

        Ok(record)
    }

    /// Imports content from an external URL
    ///
    /// This method:
    /// 1. Fetches the content behind the URL
    /// 2. Derives a display name (hint, else source file name, else generated)
    /// 3. Derives a media type (source header, else `application/octet-stream`)
    /// 4. Behaves as [`store_new`](Self::store_new) from there
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to import from
    /// * `name_hint` - Display name to use instead of the derived one
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TooLarge`] for oversized content, or an error
    /// if the fetch, blob write, or record persistence fails
    pub async fn import_from_url(
        &self,
        url: &str,
        name_hint: Option<&str>,
    ) -> Result<FileRecord> {
        let fetched = self
            .fetcher
            .fetch(url)
            .await
            .with_context(|| format!("Failed to fetch content from {url}"))?;

        let original_name = match name_hint {
            Some(hint) => hint.to_string(),
            None => fetched
                .file_name
                .clone()
                .unwrap_or_else(|| format!("import-{}", Uuid::new_v4())),
        };

        let mime_type = fetched
            .mime_type
            .as_deref()
            .and_then(|m| MimeType::new(m.to_string()).ok())
            .unwrap_or_else(MimeType::octet_stream);

        self.store_new(&original_name, mime_type, &fetched.data)
            .await
    }

    /// Rejects content above the configured size limit
    fn check_size(&self, data: &[u8]) -> Result<()> {
        let size = data.len() as u64;
        if size > self.max_upload_bytes {
            return Err(IntakeError::TooLarge {
                size,
                limit: self.max_upload_bytes,
            }
            .into());
        }
        Ok(())
    }
}
