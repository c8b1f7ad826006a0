//! SQLite implementation of IRecordRepository
//!
//! This module provides the concrete SQLite-based implementation of the
//! record repository port defined in drivemirror-core. It handles all domain
//! type serialization/deserialization and SQL query construction.
//!
//! ## Type Mapping
//!
//! | Domain Type   | SQL Type | Strategy                                   |
//! |---------------|----------|--------------------------------------------|
//! | RecordId      | TEXT     | UUID string via `.to_string()` / `FromStr` |
//! | StorageKey    | TEXT     | String via `.as_str()` / serde             |
//! | MimeType      | TEXT     | String via `.as_str()` / serde             |
//! | RemoteFileId  | TEXT     | Nullable string via `.as_str()` / serde    |
//! | SyncStatus    | TEXT     | Stable snake_case name                     |
//! | DateTime<Utc> | TEXT     | ISO 8601 via `to_rfc3339()`                |
//!
//! RFC 3339 timestamps in UTC sort correctly as plain text, which backs the
//! `ORDER BY updated_at` clauses.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use drivemirror_core::domain::{FileRecord, SyncStatus};
use drivemirror_core::domain::newtypes::RecordId;
use drivemirror_core::ports::{IRecordRepository, RecordFilter};

use crate::StoreError;

/// SQLite-based implementation of the record repository port
///
/// Provides persistent storage for file records using SQLite.
/// All operations are performed through a connection pool for concurrency.
pub struct SqliteRecordRepository {
    pool: SqlitePool,
}

impl SqliteRecordRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// Serialize a SyncStatus to its stored string representation
fn sync_status_to_string(status: SyncStatus) -> String {
    status.name().to_string()
}

/// Deserialize a SyncStatus from its stored string representation
fn sync_status_from_string(s: &str) -> Result<SyncStatus, StoreError> {
    match s {
        "in_progress" => Ok(SyncStatus::InProgress),
        "outdated" => Ok(SyncStatus::Outdated),
        "uploaded" => Ok(SyncStatus::Uploaded),
        "error" => Ok(SyncStatus::Error),
        "pending_delete" => Ok(SyncStatus::PendingDelete),
        "deleted" => Ok(SyncStatus::Deleted),
        other => Err(StoreError::SerializationError(format!(
            "Unknown sync status: {}",
            other
        ))),
    }
}

/// Parse a DateTime<Utc> from an ISO 8601 string
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Try parsing without timezone (SQLite default format)
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                .map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            StoreError::SerializationError(format!("Failed to parse datetime '{}': {}", s, e))
        })
}

// ============================================================================
// Row mapping
// ============================================================================

/// Reconstruct a FileRecord from a database row
///
/// Uses serde JSON deserialization to reconstruct the FileRecord since the
/// struct has private fields that can only be set through constructors or
/// deserialization.
fn record_from_row(row: &SqliteRow) -> Result<FileRecord, StoreError> {
    let id_str: String = row.get("id");
    let original_name: String = row.get("original_name");
    let storage_key: String = row.get("storage_key");
    let mime_type: String = row.get("mime_type");
    let size_bytes: i64 = row.get("size_bytes");
    let remote_id_str: Option<String> = row.get("remote_id");
    let status_str: String = row.get("sync_status");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    // Round-trip the stored values through the typed parsers so a corrupted
    // row surfaces as a SerializationError, not a serde panic downstream.
    let status = sync_status_from_string(&status_str)?;
    let created_at = parse_datetime(&created_at_str)?;
    let updated_at = parse_datetime(&updated_at_str)?;

    let remote_id_val = match &remote_id_str {
        Some(rid) if !rid.is_empty() => serde_json::Value::String(rid.clone()),
        _ => serde_json::Value::Null,
    };

    let record_json = serde_json::json!({
        "id": id_str,
        "original_name": original_name,
        "storage_key": storage_key,
        "mime_type": mime_type,
        "size_bytes": size_bytes as u64,
        "remote_id": remote_id_val,
        "status": status.name(),
        "created_at": created_at.to_rfc3339(),
        "updated_at": updated_at.to_rfc3339(),
    });

    let record: FileRecord = serde_json::from_value(record_json).map_err(|e| {
        StoreError::SerializationError(format!("Failed to reconstruct FileRecord from row: {}", e))
    })?;

    Ok(record)
}

// ============================================================================
// IRecordRepository implementation
// ============================================================================

#[async_trait::async_trait]
impl IRecordRepository for SqliteRecordRepository {
    async fn save_record(&self, record: &FileRecord) -> anyhow::Result<()> {
        let id = record.id().to_string();
        let original_name = record.original_name().to_string();
        let storage_key = record.storage_key().as_str().to_string();
        let mime_type = record.mime_type().as_str().to_string();
        let size_bytes = record.size_bytes() as i64;
        let remote_id = record.remote_id().map(|r| r.as_str().to_string());
        let sync_status = sync_status_to_string(record.status());
        let created_at = record.created_at().to_rfc3339();
        let updated_at = record.updated_at().to_rfc3339();

        sqlx::query(
            "INSERT OR REPLACE INTO file_records \
             (id, original_name, storage_key, mime_type, size_bytes, \
              remote_id, sync_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&original_name)
        .bind(&storage_key)
        .bind(&mime_type)
        .bind(size_bytes)
        .bind(&remote_id)
        .bind(&sync_status)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(record_id = %id, status = %sync_status, "Saved file record");
        Ok(())
    }

    async fn find_by_id(&self, id: &RecordId) -> anyhow::Result<Option<FileRecord>> {
        let id_str = id.to_string();

        let row = sqlx::query("SELECT * FROM file_records WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(record_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn query_records(&self, filter: &RecordFilter) -> anyhow::Result<Vec<FileRecord>> {
        let mut sql = String::from("SELECT * FROM file_records WHERE 1=1");
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref statuses) = filter.statuses {
            if !statuses.is_empty() {
                let placeholders = vec!["?"; statuses.len()].join(", ");
                sql.push_str(&format!(" AND sync_status IN ({placeholders})"));
                for status in statuses {
                    binds.push(sync_status_to_string(*status));
                }
            }
        }

        if let Some(ref excluded) = filter.exclude_statuses {
            if !excluded.is_empty() {
                let placeholders = vec!["?"; excluded.len()].join(", ");
                sql.push_str(&format!(" AND sync_status NOT IN ({placeholders})"));
                for status in excluded {
                    binds.push(sync_status_to_string(*status));
                }
            }
        }

        match filter.has_remote_id {
            Some(true) => sql.push_str(" AND remote_id IS NOT NULL"),
            Some(false) => sql.push_str(" AND remote_id IS NULL"),
            None => {}
        }

        if filter.oldest_first {
            sql.push_str(" ORDER BY updated_at ASC");
        } else {
            sql.push_str(" ORDER BY updated_at DESC");
        }

        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        // Build the query dynamically
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(record_from_row(row)?);
        }

        Ok(records)
    }

    async fn count_by_status(&self) -> anyhow::Result<HashMap<String, u64>> {
        let rows = sqlx::query(
            "SELECT sync_status, COUNT(*) as count FROM file_records \
             GROUP BY sync_status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = HashMap::new();
        for row in &rows {
            let status_str: String = row.get("sync_status");
            let count: i64 = row.get("count");

            // Reject rows whose status no longer maps to a known variant
            let status = sync_status_from_string(&status_str)?;
            counts.insert(status.name().to_string(), count as u64);
        }

        Ok(counts)
    }
}
