//! Record repository port (driven/secondary port)
//!
//! This module defines the persistence interface for
//! [`FileRecord`](crate::domain::file_record::FileRecord) entities. The
//! primary implementation is SQLite-backed.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQL, serialization) and the core only needs success/failure.
//! - `save_record` is an upsert keyed on the record id. Records are never
//!   physically removed; terminal states stay queryable.
//! - `RecordFilter` keeps query intent in the core while letting adapters
//!   build native queries from it.

use std::collections::HashMap;

use crate::domain::file_record::{FileRecord, SyncStatus};
use crate::domain::newtypes::RecordId;

// ============================================================================
// RecordFilter
// ============================================================================

/// Filter criteria for record queries
///
/// All criteria are optional and combine with AND semantics. An empty filter
/// matches every record.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Match only records in one of these statuses
    pub statuses: Option<Vec<SyncStatus>>,
    /// Match only records in none of these statuses
    pub exclude_statuses: Option<Vec<SyncStatus>>,
    /// Match on presence (`true`) or absence (`false`) of a remote id
    pub has_remote_id: Option<bool>,
    /// Return oldest-updated records first instead of newest-updated
    pub oldest_first: bool,
    /// Maximum number of records to return
    pub limit: Option<u32>,
}

impl RecordFilter {
    /// Creates an empty filter matching all records
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to records in the given statuses
    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<SyncStatus>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    /// Excludes records in the given statuses
    #[must_use]
    pub fn with_excluded_statuses(mut self, statuses: Vec<SyncStatus>) -> Self {
        self.exclude_statuses = Some(statuses);
        self
    }

    /// Restricts the filter by remote id presence
    #[must_use]
    pub fn with_remote_id_present(mut self, present: bool) -> Self {
        self.has_remote_id = Some(present);
        self
    }

    /// Orders results oldest-updated first
    #[must_use]
    pub fn oldest_updated_first(mut self) -> Self {
        self.oldest_first = true;
        self
    }

    /// Caps the number of returned records
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if no criteria are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_none()
            && self.exclude_statuses.is_none()
            && self.has_remote_id.is_none()
            && !self.oldest_first
            && self.limit.is_none()
    }
}

// ============================================================================
// IRecordRepository trait
// ============================================================================

/// Port trait for file record persistence
#[async_trait::async_trait]
pub trait IRecordRepository: Send + Sync {
    // --- Write operations ---

    /// Saves a record, inserting or replacing by id
    async fn save_record(&self, record: &FileRecord) -> anyhow::Result<()>;

    // --- Read operations ---

    /// Finds a record by its id
    async fn find_by_id(&self, id: &RecordId) -> anyhow::Result<Option<FileRecord>>;

    /// Queries records matching a filter
    async fn query_records(&self, filter: &RecordFilter) -> anyhow::Result<Vec<FileRecord>>;

    /// Counts records grouped by sync status
    ///
    /// Statuses with no records are absent from the map.
    async fn count_by_status(&self) -> anyhow::Result<HashMap<String, u64>>;
}

// ============================================================================
// Tests
// ============================================================================
