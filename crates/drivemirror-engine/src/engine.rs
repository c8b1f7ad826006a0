//! Reconciliation engine
//!
//! The [`ReconcileEngine`] drives every interaction with the remote backend:
//! it pushes records whose content is waiting to go out, retires records
//! whose deletion was requested, and on demand recreates local blobs that
//! have gone missing from their remote mirrors.
//!
//! ## Pass Flow
//!
//! A reconciliation pass runs two phases in a fixed order:
//!
//! 1. **Push**: records in `in_progress` or `outdated` are uploaded (new
//!    remote object) or updated (existing remote object), then marked
//!    `uploaded`.
//! 2. **Delete**: records in `pending_delete` have their remote counterpart
//!    removed, then become `deleted` tombstones.
//!
//! ## Failure Isolation
//!
//! A failure on one record parks that record in `error` and the pass moves
//! on; only scaffolding failures (the candidate query itself) abort a phase.
//! Error causes go to the log, not the database.
//!
//! ## Single Flight
//!
//! At most one pass runs per engine at a time. A pass that finds another
//! already in flight returns an all-zero [`PassSummary`] immediately instead
//! of queueing behind it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use drivemirror_core::domain::file_record::{FileRecord, SyncStatus};
use drivemirror_core::ports::{IBlobStore, IRecordRepository, IRemoteStore, RecordFilter};
use serde::Serialize;
use tracing::{debug, error, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Smallest batch a restore run will accept.
const RESTORE_LIMIT_MIN: u32 = 1;

/// Largest batch a restore run will accept.
const RESTORE_LIMIT_MAX: u32 = 50;

// ============================================================================
// Summaries
// ============================================================================

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Records pushed to the remote backend
    pub synced: u32,
    /// Records retired after their remote counterpart was removed
    pub deleted: u32,
    /// Records parked in `error` during the pass
    pub failed: u32,
}

/// Counters for one restore run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RestoreSummary {
    /// Effective batch bound after clamping
    pub limit: u32,
    /// Candidate records examined
    pub checked: u32,
    /// Blobs recreated from remote content
    pub restored: u32,
    /// Records whose blob was already present
    pub skipped: u32,
    /// Records parked in `error` during the run
    pub failed: u32,
}

// ============================================================================
// Pass guard
// ============================================================================

/// RAII claim on the engine's single pass slot.
///
/// Dropping the guard releases the slot, including when a pass unwinds
/// early through `?`.
struct PassGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PassGuard<'a> {
    /// Claims the slot; `None` when another pass already holds it.
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ============================================================================
// ReconcileEngine
// ============================================================================

/// Engine reconciling local file records against the remote backend.
///
/// Holds Arc references to the driven ports so it can be shared between the
/// CLI and the daemon loop. All state beyond the ports is the single-flight
/// flag.
pub struct ReconcileEngine {
    remote: Arc<dyn IRemoteStore + Send + Sync>,
    records: Arc<dyn IRecordRepository + Send + Sync>,
    blobs: Arc<dyn IBlobStore + Send + Sync>,
    /// True while a pass is running on this engine
    pass_active: AtomicBool,
}

impl ReconcileEngine {
    /// Create a new `ReconcileEngine` over the given ports.
    #[must_use]
    pub fn new(
        remote: Arc<dyn IRemoteStore + Send + Sync>,
        records: Arc<dyn IRecordRepository + Send + Sync>,
        blobs: Arc<dyn IBlobStore + Send + Sync>,
    ) -> Self {
        Self {
            remote,
            records,
            blobs,
            pass_active: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Reconciliation pass
    // ========================================================================

    /// Runs one reconciliation pass
    ///
    /// 1. Pushes every record awaiting upload, oldest mutation first
    /// 2. Retires every record awaiting deletion
    ///
    /// If a pass is already running on this engine, returns an all-zero
    /// summary without touching any record.
    ///
    /// # Errors
    /// Returns an error when a candidate query fails; per-record failures
    /// are absorbed into the summary's `failed` counter instead.
    #[tracing::instrument(skip(self))]
    pub async fn run_reconciliation_pass(&self) -> Result<PassSummary> {
        let Some(_guard) = PassGuard::try_acquire(&self.pass_active) else {
            info!("Reconciliation pass already running, skipping");
            return Ok(PassSummary::default());
        };

        let start_time = std::time::Instant::now();
        let mut summary = PassSummary::default();

        info!("Reconciliation pass starting");

        // Phase order is fixed: push, then delete.
        self.push_phase(&mut summary).await?;
        self.delete_phase(&mut summary).await?;

        info!(
            synced = summary.synced,
            deleted = summary.deleted,
            failed = summary.failed,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Reconciliation pass completed"
        );

        Ok(summary)
    }

    /// Pushes all records whose content is ahead of the remote copy
    async fn push_phase(&self, summary: &mut PassSummary) -> Result<()> {
        let filter = RecordFilter::new()
            .with_statuses(vec![SyncStatus::InProgress, SyncStatus::Outdated])
            .oldest_updated_first();
        let candidates = self
            .records
            .query_records(&filter)
            .await
            .context("Failed to query records awaiting push")?;

        info!(candidates = candidates.len(), "Push phase starting");

        for mut record in candidates {
            match self.push_record(&mut record).await {
                Ok(()) => summary.synced += 1,
                Err(err) => {
                    warn!(
                        record_id = %record.id(),
                        error = %format!("{err:#}"),
                        "Push failed, parking record"
                    );
                    self.park_failed(&mut record).await;
                    summary.failed += 1;
                }
            }
        }

        Ok(())
    }

    /// Pushes a single record, choosing upload vs update by remote id
    async fn push_record(&self, record: &mut FileRecord) -> Result<()> {
        let blob_present = self
            .blobs
            .exists(record.storage_key())
            .await
            .context("Failed to check the content blob")?;
        if !blob_present {
            anyhow::bail!("Content blob {} is missing locally", record.storage_key());
        }

        let local_path = self.blobs.resolve(record.storage_key());

        let remote_id = match record.remote_id() {
            Some(existing) => self
                .remote
                .update_existing(existing, &local_path, record.mime_type(), record.original_name())
                .await
                .context("Failed to update remote content")?,
            None => self
                .remote
                .upload_new(&local_path, record.mime_type(), record.original_name())
                .await
                .context("Failed to upload new remote content")?,
        };

        record.set_remote_id(remote_id);
        record
            .transition_to(SyncStatus::Uploaded)
            .context("Failed to mark record uploaded")?;
        self.records
            .save_record(record)
            .await
            .context("Failed to persist pushed record")?;

        debug!(record_id = %record.id(), "Record pushed");
        Ok(())
    }

    /// Retires all records whose deletion was requested
    async fn delete_phase(&self, summary: &mut PassSummary) -> Result<()> {
        let filter = RecordFilter::new()
            .with_statuses(vec![SyncStatus::PendingDelete])
            .oldest_updated_first();
        let candidates = self
            .records
            .query_records(&filter)
            .await
            .context("Failed to query records awaiting removal")?;

        info!(candidates = candidates.len(), "Delete phase starting");

        for mut record in candidates {
            match self.delete_record(&mut record).await {
                Ok(()) => summary.deleted += 1,
                Err(err) => {
                    warn!(
                        record_id = %record.id(),
                        error = %format!("{err:#}"),
                        "Remote delete failed, parking record"
                    );
                    self.park_failed(&mut record).await;
                    summary.failed += 1;
                }
            }
        }

        Ok(())
    }

    /// Retires a single record, removing its remote counterpart first
    async fn delete_record(&self, record: &mut FileRecord) -> Result<()> {
        // Records that never reached the backend have nothing to remove there.
        if let Some(remote_id) = record.remote_id() {
            self.remote
                .delete(remote_id)
                .await
                .context("Failed to delete remote content")?;
        }

        record
            .transition_to(SyncStatus::Deleted)
            .context("Failed to mark record deleted")?;
        self.records
            .save_record(record)
            .await
            .context("Failed to persist retired record")?;

        debug!(record_id = %record.id(), "Record retired");
        Ok(())
    }

    // ========================================================================
    // Restore
    // ========================================================================

    /// Recreates locally missing blobs from their remote mirrors
    ///
    /// Examines up to `limit` records (clamped to 1..=50), oldest mutation
    /// first, considering only records that have a remote id and are neither
    /// deleted nor awaiting deletion. Records whose blob is present are
    /// counted as skipped; the rest are downloaded back into the blob store
    /// and marked `uploaded`.
    ///
    /// Restore runs independently of the reconciliation pass slot.
    ///
    /// # Errors
    /// Returns an error when the candidate query fails; per-record failures
    /// are absorbed into the summary's `failed` counter instead.
    #[tracing::instrument(skip(self))]
    pub async fn restore_missing(&self, limit: u32) -> Result<RestoreSummary> {
        let effective = limit.clamp(RESTORE_LIMIT_MIN, RESTORE_LIMIT_MAX);
        if effective != limit {
            warn!(requested = limit, effective, "Restore limit clamped");
        }

        let start_time = std::time::Instant::now();
        let mut summary = RestoreSummary {
            limit: effective,
            ..RestoreSummary::default()
        };

        let filter = RecordFilter::new()
            .with_excluded_statuses(vec![SyncStatus::Deleted, SyncStatus::PendingDelete])
            .with_remote_id_present(true)
            .oldest_updated_first()
            .with_limit(effective);
        let candidates = self
            .records
            .query_records(&filter)
            .await
            .context("Failed to query restore candidates")?;

        info!(candidates = candidates.len(), "Restore run starting");

        for mut record in candidates {
            summary.checked += 1;

            let blob_present = match self.blobs.exists(record.storage_key()).await {
                Ok(present) => present,
                Err(err) => {
                    warn!(
                        record_id = %record.id(),
                        error = %format!("{err:#}"),
                        "Blob check failed, parking record"
                    );
                    self.park_failed(&mut record).await;
                    summary.failed += 1;
                    continue;
                }
            };
            if blob_present {
                summary.skipped += 1;
                continue;
            }

            match self.restore_record(&mut record).await {
                Ok(()) => summary.restored += 1,
                Err(err) => {
                    warn!(
                        record_id = %record.id(),
                        error = %format!("{err:#}"),
                        "Restore failed, parking record"
                    );
                    self.park_failed(&mut record).await;
                    summary.failed += 1;
                }
            }
        }

        info!(
            checked = summary.checked,
            restored = summary.restored,
            skipped = summary.skipped,
            failed = summary.failed,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Restore run completed"
        );

        Ok(summary)
    }

    /// Downloads one record's remote content back into the blob store
    async fn restore_record(&self, record: &mut FileRecord) -> Result<()> {
        let remote_id = record
            .remote_id()
            .ok_or_else(|| anyhow::anyhow!("Restore candidate has no remote id"))?
            .clone();
        let destination = self.blobs.resolve(record.storage_key());

        if record.status() == SyncStatus::Outdated {
            // The replacement content is gone; the previous remote version is
            // the best copy left.
            warn!(
                record_id = %record.id(),
                "Restoring previously uploaded content over a lost replacement"
            );
        }

        self.remote
            .download_to_local(&remote_id, &destination)
            .await
            .context("Failed to download remote content")?;

        let size = self
            .blobs
            .size_of(record.storage_key())
            .await
            .context("Failed to measure restored blob")?;
        record.set_size_bytes(size);
        record
            .transition_to(SyncStatus::Uploaded)
            .context("Failed to mark record uploaded")?;
        self.records
            .save_record(record)
            .await
            .context("Failed to persist restored record")?;

        debug!(record_id = %record.id(), bytes = size, "Record restored");
        Ok(())
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Parks a record in `error`, best effort
    ///
    /// Both steps only log on failure: a record that cannot even be parked
    /// is left as-is for a later pass, and the phase keeps going either way.
    async fn park_failed(&self, record: &mut FileRecord) {
        if let Err(err) = record.transition_to(SyncStatus::Error) {
            error!(
                record_id = %record.id(),
                error = %err,
                "Cannot park record in error state"
            );
            return;
        }
        if let Err(err) = self.records.save_record(record).await {
            error!(
                record_id = %record.id(),
                error = %format!("{err:#}"),
                "Failed to persist error state"
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
