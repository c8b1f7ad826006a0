//! FileRecord domain entity and its sync-status state machine
//!
//! A [`FileRecord`] tracks one piece of user content: where its bytes live in
//! the local blob store, whether a mirror of it exists in remote storage, and
//! where it sits in the synchronization lifecycle.
//!
//! Records are never physically removed. A deletion request walks the record
//! through `pending_delete` and the engine's delete phase into `deleted`,
//! which is retained as an audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{MimeType, RecordId, RemoteFileId, StorageKey};

// ============================================================================
// SyncStatus state machine
// ============================================================================

/// Position of a record in the synchronization lifecycle
///
/// ## State machine
///
/// ```text
///  (new) ──create──▶ in_progress ──push ok──▶ uploaded
///                        │                       │
///                     push fail               replace
///                        ▼                       ▼
///                      error ◀──push fail── outdated ──push ok──▶ uploaded
///
///  any ──delete requested──▶ pending_delete ──delete ok──▶ deleted
///                                 │
///                             delete fail
///                                 ▼
///                               error
/// ```
///
/// Engine-driven transitions go through [`transition_to`](Self::transition_to)
/// and are checked against this table. The external mutators (content
/// replacement, deletion request) reset the status unconditionally via
/// [`FileRecord::replace_content`] and [`FileRecord::request_deletion`]; they
/// deliberately bypass the table because new user input supersedes whatever
/// the engine believed about the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Freshly created content, never pushed
    InProgress,
    /// Content replaced since the last push; remote copy (if any) is stale
    Outdated,
    /// Local and remote content matched at the time of the last push/restore
    Uploaded,
    /// Last engine action on this record failed; parked until an external
    /// mutator intervenes
    Error,
    /// Local blob already removed; remote counterpart awaits cleanup
    PendingDelete,
    /// Fully retired; kept for audit
    Deleted,
}

impl SyncStatus {
    /// Stable lowercase name, matching the serialized form
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SyncStatus::InProgress => "in_progress",
            SyncStatus::Outdated => "outdated",
            SyncStatus::Uploaded => "uploaded",
            SyncStatus::Error => "error",
            SyncStatus::PendingDelete => "pending_delete",
            SyncStatus::Deleted => "deleted",
        }
    }

    /// True if the push phase should pick this record up
    #[must_use]
    pub fn needs_push(&self) -> bool {
        matches!(self, SyncStatus::InProgress | SyncStatus::Outdated)
    }

    /// True if the delete phase should pick this record up
    #[must_use]
    pub fn awaiting_removal(&self) -> bool {
        matches!(self, SyncStatus::PendingDelete)
    }

    /// True if the restore phase may consider this record
    ///
    /// Restore additionally requires a remote id; that part of the predicate
    /// lives on the record, not the status.
    #[must_use]
    pub fn is_restorable(&self) -> bool {
        !matches!(self, SyncStatus::Deleted | SyncStatus::PendingDelete)
    }

    /// True if the record is parked and needs operator attention
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        matches!(self, SyncStatus::Error)
    }

    /// Checks whether an engine-driven transition to `target` is legal
    #[must_use]
    pub fn can_transition_to(&self, target: &SyncStatus) -> bool {
        use SyncStatus::*;
        matches!(
            (self, target),
            // Push phase outcomes
            (InProgress, Uploaded)
                | (InProgress, Error)
                | (Outdated, Uploaded)
                | (Outdated, Error)
                // Delete phase outcomes
                | (PendingDelete, Deleted)
                | (PendingDelete, Error)
                // Restore phase outcomes (refresh, recovery, repeated failure)
                | (Uploaded, Uploaded)
                | (Uploaded, Error)
                | (Error, Uploaded)
                | (Error, Error)
        )
    }

    /// Performs an engine-driven transition, validating it first
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTransition`] if the move is not in the
    /// transition table.
    pub fn transition_to(&mut self, target: SyncStatus) -> Result<(), DomainError> {
        if self.can_transition_to(&target) {
            *self = target;
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self.name().to_string(),
                to: target.name().to_string(),
            })
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// FileRecord entity
// ============================================================================

/// Metadata and sync state for one piece of mirrored content
///
/// The record store exclusively owns persistence of this entity; the engine
/// and the intake use case hold it only transiently while mutating it, and
/// every mutation is written through immediately by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque immutable identity
    id: RecordId,
    /// User-supplied display name, also used as the remote object name
    original_name: String,
    /// Where the bytes live in the local blob store; reassigned on each
    /// content replacement, never edited in place
    storage_key: StorageKey,
    /// Media type of the current content
    mime_type: MimeType,
    /// Size of the current content in bytes
    size_bytes: u64,
    /// Remote handle, set by the first successful push and kept across
    /// content replacements so later pushes update rather than recreate
    remote_id: Option<RemoteFileId>,
    /// Lifecycle position
    status: SyncStatus,
    /// When the record was created
    created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Creates a record for freshly ingested content
    ///
    /// Starts in `in_progress` with no remote id; the next reconciliation
    /// pass will push it.
    #[must_use]
    pub fn new(
        original_name: String,
        storage_key: StorageKey,
        mime_type: MimeType,
        size_bytes: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            original_name,
            storage_key,
            mime_type,
            size_bytes,
            remote_id: None,
            status: SyncStatus::InProgress,
            created_at: now,
            updated_at: now,
        }
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// The record's identity
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// User-facing display name
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Current blob-store key
    #[must_use]
    pub fn storage_key(&self) -> &StorageKey {
        &self.storage_key
    }

    /// Media type of the current content
    #[must_use]
    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    /// Size of the current content in bytes
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Remote handle, if the content has ever been pushed
    #[must_use]
    pub fn remote_id(&self) -> Option<&RemoteFileId> {
        self.remote_id.as_ref()
    }

    /// Current lifecycle position
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Creation timestamp
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ------------------------------------------------------------------
    // Engine-facing mutators
    // ------------------------------------------------------------------

    /// Records the remote handle returned by an upload or update
    pub fn set_remote_id(&mut self, remote_id: RemoteFileId) {
        self.remote_id = Some(remote_id);
        self.touch();
    }

    /// Updates the content size, e.g. after a restore rewrote the blob
    pub fn set_size_bytes(&mut self, size_bytes: u64) {
        self.size_bytes = size_bytes;
        self.touch();
    }

    /// Performs a validated engine transition
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTransition`] for moves outside the
    /// transition table.
    pub fn transition_to(&mut self, target: SyncStatus) -> Result<(), DomainError> {
        self.status.transition_to(target)?;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // External mutators (unconditional resets)
    // ------------------------------------------------------------------

    /// Swaps in replacement content
    ///
    /// Forces the status to `outdated` regardless of the previous value,
    /// including `error` and mid-sync states: replacement content always
    /// supersedes whatever the backend currently holds. The remote id is
    /// kept so the next push updates the existing remote object.
    ///
    /// The caller owns the blob-store side: writing the new content under
    /// `storage_key` and removing the previous blob.
    pub fn replace_content(
        &mut self,
        storage_key: StorageKey,
        mime_type: MimeType,
        size_bytes: u64,
        original_name: String,
    ) {
        self.storage_key = storage_key;
        self.mime_type = mime_type;
        self.size_bytes = size_bytes;
        self.original_name = original_name;
        self.status = SyncStatus::Outdated;
        self.touch();
    }

    /// Marks the record for deletion
    ///
    /// Forces `pending_delete` regardless of the previous status. Records
    /// without a remote id still take this path; the delete phase closes
    /// them out without a remote call, keeping a single exit path.
    ///
    /// The caller is responsible for having already removed the local blob.
    pub fn request_deletion(&mut self) {
        self.status = SyncStatus::PendingDelete;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Unit tests
// ============================================================================
